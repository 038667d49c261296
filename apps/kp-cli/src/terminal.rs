//! Terminal pixel size.

/// Pixel size reported by the terminal on stdout, if it reports one.
#[cfg(unix)]
pub fn pixel_size() -> Option<(u32, u32)> {
    // SAFETY: winsize is plain data and TIOCGWINSZ only writes into it.
    let mut size: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut size) };
    if result != 0 || size.ws_xpixel == 0 || size.ws_ypixel == 0 {
        return None;
    }
    Some((u32::from(size.ws_xpixel), u32::from(size.ws_ypixel)))
}

#[cfg(not(unix))]
pub fn pixel_size() -> Option<(u32, u32)> {
    None
}

/// Terminal pixel size, or `fallback` when the terminal does not say.
pub fn pixel_size_or(fallback: [u32; 2]) -> (u32, u32) {
    match pixel_size() {
        Some(size) => size,
        None => {
            tracing::debug!(?fallback, "terminal reports no pixel size");
            (fallback[0], fallback[1])
        }
    }
}
