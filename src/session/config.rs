/// Configuration for an interview session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Length of the signing window sampled per candidate turn
    pub capture_window_ms: u64,

    /// Snapshot rate within the signing window
    pub frames_per_second: u32,

    /// System banner seeding the conversation log
    pub welcome_banner: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            capture_window_ms: 3000,
            frames_per_second: 5,
            welcome_banner: "Welcome to the Sign Interview Bridge. The interview will now begin."
                .to_string(),
        }
    }
}
