//! Script and navigation bookkeeping for the hosted page.
//!
//! Init scripts recorded before the webview is built become its
//! initialization set, so they run before every document's own script.
//! Scripts recorded later are evaluated at once and replayed whenever a
//! new document starts loading. Evaluations and navigation requested
//! before the build wait here until it happens.

#[derive(Debug, Default)]
pub(crate) struct PageLedger {
    init_scripts: Vec<String>,
    /// Length of `init_scripts` when the builder took its copy.
    built_with: Option<usize>,
    deferred_evals: Vec<String>,
    deferred_url: Option<String>,
}

impl PageLedger {
    /// Record an init script. Returns it back when the webview already
    /// exists and the script must also be evaluated now.
    pub(crate) fn add_init(&mut self, js: String) -> Option<String> {
        let run_now = self.built_with.is_some().then(|| js.clone());
        self.init_scripts.push(js);
        run_now
    }

    /// Freeze the initialization set handed to the webview builder.
    pub(crate) fn begin_build(&mut self) -> Vec<String> {
        self.built_with = Some(self.init_scripts.len());
        self.init_scripts.clone()
    }

    /// Scripts the builder never saw, in registration order.
    pub(crate) fn late_init_scripts(&self) -> Vec<String> {
        match self.built_with {
            Some(n) => self.init_scripts[n..].to_vec(),
            None => Vec::new(),
        }
    }

    pub(crate) fn defer_eval(&mut self, js: String) {
        self.deferred_evals.push(js);
    }

    pub(crate) fn take_deferred_evals(&mut self) -> Vec<String> {
        std::mem::take(&mut self.deferred_evals)
    }

    /// Remember a navigation; the last one wins.
    pub(crate) fn defer_navigation(&mut self, url: String) {
        self.deferred_url = Some(url);
    }

    pub(crate) fn take_deferred_navigation(&mut self) -> Option<String> {
        self.deferred_url.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripts_before_build_go_to_the_builder() {
        let mut page = PageLedger::default();
        assert_eq!(page.add_init("a".into()), None);
        assert_eq!(page.add_init("b".into()), None);
        assert!(page.late_init_scripts().is_empty());

        assert_eq!(page.begin_build(), vec!["a", "b"]);
        assert!(page.late_init_scripts().is_empty());
        assert!(page.add_init("c".into()).is_some());
    }

    #[test]
    fn scripts_after_build_run_now_and_are_replayed() {
        let mut page = PageLedger::default();
        page.add_init("early".into());
        page.begin_build();

        assert_eq!(page.add_init("late".into()).as_deref(), Some("late"));
        assert_eq!(page.add_init("later".into()).as_deref(), Some("later"));
        assert_eq!(page.late_init_scripts(), vec!["late", "later"]);
    }

    #[test]
    fn nothing_is_late_before_build() {
        let mut page = PageLedger::default();
        page.add_init("a".into());
        assert!(page.late_init_scripts().is_empty());
    }

    #[test]
    fn deferred_evals_flush_once_in_order() {
        let mut page = PageLedger::default();
        page.defer_eval("one".into());
        page.defer_eval("two".into());
        assert_eq!(page.take_deferred_evals(), vec!["one", "two"]);
        assert!(page.take_deferred_evals().is_empty());
    }

    #[test]
    fn last_deferred_navigation_wins() {
        let mut page = PageLedger::default();
        assert_eq!(page.take_deferred_navigation(), None);
        page.defer_navigation("https://a.example".into());
        page.defer_navigation("https://b.example".into());
        assert_eq!(
            page.take_deferred_navigation().as_deref(),
            Some("https://b.example")
        );
        assert_eq!(page.take_deferred_navigation(), None);
    }
}
