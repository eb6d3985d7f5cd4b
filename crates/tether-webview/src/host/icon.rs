//! PNG window icons.

use tether_common::PlatformError;
use winit::window::Icon;

/// Decode PNG bytes into 8-bit RGBA pixels plus width and height.
pub fn decode_png(bytes: &[u8]) -> Result<(Vec<u8>, u32, u32), PlatformError> {
    let mut decoder = png::Decoder::new(bytes);
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| PlatformError::IconError(format!("invalid PNG: {e}")))?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| PlatformError::IconError(format!("invalid PNG: {e}")))?;
    buf.truncate(info.buffer_size());

    let rgba = match info.color_type {
        png::ColorType::Rgba => buf,
        png::ColorType::Rgb => buf
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        png::ColorType::GrayscaleAlpha => buf
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0], p[1]])
            .collect(),
        png::ColorType::Grayscale => buf.iter().flat_map(|&g| [g, g, g, 255]).collect(),
        png::ColorType::Indexed => {
            return Err(PlatformError::IconError(
                "indexed PNG was not expanded".into(),
            ))
        }
    };
    Ok((rgba, info.width, info.height))
}

/// Decode PNG bytes into a window icon.
pub fn load_icon(bytes: &[u8]) -> Result<Icon, PlatformError> {
    let (rgba, width, height) = decode_png(bytes)?;
    Icon::from_rgba(rgba, width, height).map_err(|e| PlatformError::IconError(e.to_string()))
}
