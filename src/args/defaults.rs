use std::num::NonZeroUsize;
use std::time::Duration;

pub(crate) const DEFAULT_USER_AGENT: &str = concat!(
    "stampede-loadtest/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/Lythaeon/stampede)"
);

pub(crate) const DEFAULT_WORKFLOWS: u64 = 40;
pub(crate) const DEFAULT_ITERATIONS: u32 = 3;
pub(crate) const DEFAULT_PASSWORD: &str = "12341234";
pub(crate) const DEFAULT_AUDIO_DIR: &str = "resources/audio";
pub(crate) const DEFAULT_IMAGES_DIR: &str = "resources/images";
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Worker-pool bound when none is given: twice the hardware threads, capped
/// at 32, matching common general-purpose executor defaults.
pub(crate) fn default_concurrency() -> NonZeroUsize {
    let threads = std::thread::available_parallelism().map_or(4, NonZeroUsize::get);
    NonZeroUsize::new(threads.saturating_mul(2).min(32)).unwrap_or(NonZeroUsize::MIN)
}
