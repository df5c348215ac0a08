pub mod seeking {
    pub const SKIP_FORWARD: f64 = 10.0;
}

pub mod volume {
    /// Keyboard up/down step
    pub const STEP: f64 = 0.05;
    /// Level restored when unmuting while the stored volume is 0
    pub const UNMUTE_RESTORE: f64 = 0.5;
}

pub mod timing {
    use std::time::Duration;

    pub const CONTROLS_HIDE_DELAY: Duration = Duration::from_secs(3);
    /// Wall-clock interval between progress checkpoints while playing
    pub const PROGRESS_INTERVAL: Duration = Duration::from_secs(10);
    pub const INDICATOR_DURATION: Duration = Duration::from_millis(800);
    pub const TRACK_NOTIFICATION_DURATION: Duration = Duration::from_secs(2);
    pub const RESUME_FETCH_TIMEOUT: Duration = Duration::from_secs(2);
}

pub mod resume {
    /// A stored position must be strictly past this to seed a new session
    pub const MIN_RESUME_POSITION_SECS: f64 = 10.0;
    /// Records past this fraction count as finished and start over
    pub const FINISHED_FRACTION: f64 = 0.95;
}

pub mod zoom {
    pub const MIN_SCALE: f64 = 1.0;
    pub const MAX_SCALE: f64 = 4.0;
    /// Scale change per wheel delta unit
    pub const WHEEL_SENSITIVITY: f64 = 0.0015;
}

pub mod playback_speed {
    pub const MIN: f64 = 0.25;
    pub const MAX: f64 = 2.0;
}
