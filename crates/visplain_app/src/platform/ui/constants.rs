pub const PROCESSING_LABEL: &str = "Processing request... Please wait";
pub const PROGRESS_BAR_WIDTH: usize = 30;
pub const ALERT_PREFIX: &str = "error:";
