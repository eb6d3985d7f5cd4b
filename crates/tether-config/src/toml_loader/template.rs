/// Default TOML config content with inline documentation comments.
pub(crate) fn default_config_toml() -> &'static str {
    r##"# Tether Configuration
# Only override what you want to change -- missing fields use defaults.

[window]
title = "Tether"
# width = 800            # 100-16384
# height = 600           # 100-16384
# hint = "none"          # none | fixed | min | max
# devtools = false
# embed = false

[content]
# url = "https://example.com"
# html = "<html><body>Hello</body></html>"

[logging]
# level = "tether=info"
"##
}
