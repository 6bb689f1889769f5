/// ANSI color helper utilities for terminal output.
use crate::models::device::Variance;
use crate::models::session::SessionStatus;

pub const RESET: &str = "\x1b[0m";
pub const GREY: &str = "\x1b[90m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";

/// Surplus → green, deficient → red, match → reset.
pub fn color_for_variance(v: &Variance) -> &'static str {
    match v {
        Variance::Surplus(_) => GREEN,
        Variance::Deficient(_) => RED,
        Variance::Match => RESET,
    }
}

pub fn color_for_status(s: SessionStatus) -> &'static str {
    match s {
        SessionStatus::Upcoming => YELLOW,
        SessionStatus::Live => GREEN,
        SessionStatus::Completed => GREY,
    }
}

pub fn paint(color: &str, value: &str) -> String {
    format!("{color}{value}{RESET}")
}
