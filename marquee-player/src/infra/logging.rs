use env_logger::{Builder, Target};
use log::LevelFilter;

/// Initialize logging for a host embedding the player.
///
/// `RUST_LOG` wins when set; otherwise everything logs at Warn and this
/// crate at Debug.
pub fn init_logger() {
    if std::env::var("RUST_LOG").is_ok() {
        let _ = env_logger::try_init();
        return;
    }
    let _ = Builder::new()
        .target(Target::Stdout)
        .filter_level(LevelFilter::Warn)
        .filter_module("marquee_player", LevelFilter::Debug)
        .try_init();
}

/// Test-friendly logger; safe to call from every test
pub fn init_test_logger() {
    let _ = Builder::new()
        .is_test(true)
        .filter_level(LevelFilter::Debug)
        .try_init();
}
