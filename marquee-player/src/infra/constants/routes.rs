macro_rules! v1_path {
    ($path:literal) => {
        concat!("/api/v1", $path)
    };
}

/// Versioned API route definitions consumed by the player
pub mod v1 {
    pub const VERSION: &str = "v1";

    pub mod watch {
        /// Upsert endpoint, answers 200 or 204 without a payload
        pub const UPDATE_PROGRESS: &str = v1_path!("/watch/progress");
        pub const PROGRESS_ITEM: &str = v1_path!("/watch/progress/{content_id}");

        pub fn progress_item(content_id: &str) -> String {
            PROGRESS_ITEM
                .replace("{content_id}", &urlencoding::encode(content_id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::v1;

    #[test]
    fn progress_item_escapes_content_id() {
        assert_eq!(
            v1::watch::progress_item("ep 42/b"),
            "/api/v1/watch/progress/ep%2042%2Fb"
        );
    }
}
