/// Seed for a fresh round, assembled from two `Math.random` draws.
pub(crate) fn js_random_seed() -> u64 {
    let half = || seed_half(js_sys::Math::random());
    (half() << 32) | half()
}

/// Maps a `[0, 1)` float onto the full `u32` range.
fn seed_half(unit: f64) -> u64 {
    (unit * 4_294_967_296.0) as u32 as u64
}

/// Fallback used when the window width can't be read.
const DEFAULT_VIEWPORT_WIDTH: f64 = 1024.0;

pub(crate) fn viewport_width() -> f64 {
    gloo::utils::window()
        .inner_width()
        .ok()
        .and_then(|width| width.as_f64())
        .unwrap_or(DEFAULT_VIEWPORT_WIDTH)
}
