//! Desktop notification capability

use notify_rust::Notification;
use tracing::{debug, warn};

/// Outcome of the startup permission probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
    Default,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Granted => "granted",
            Permission::Denied => "denied",
            Permission::Default => "default",
        }
    }
}

/// Fire-and-forget notification sender.
///
/// Permission is probed exactly once, at startup; the countdown never
/// re-queries it. Only `Granted` actually notifies.
#[derive(Debug, Clone)]
pub struct Notifier {
    permission: Permission,
}

impl Notifier {
    /// Probe the platform notification service.
    ///
    /// `disabled` (the `--no-notify` flag) maps to `Denied`; a reachable
    /// notification daemon maps to `Granted`; a failed probe stays at
    /// `Default` and notifications are skipped.
    pub fn request_permission(disabled: bool) -> Self {
        if disabled {
            return Self {
                permission: Permission::Denied,
            };
        }

        match notify_rust::get_capabilities() {
            Ok(capabilities) => {
                debug!("Notification daemon capabilities: {:?}", capabilities);
                Self {
                    permission: Permission::Granted,
                }
            }
            Err(e) => {
                warn!("Could not reach a notification daemon: {}", e);
                Self {
                    permission: Permission::Default,
                }
            }
        }
    }

    pub fn permission(&self) -> Permission {
        self.permission
    }

    /// Send a notification; does nothing unless permission is granted.
    ///
    /// Failures are logged and swallowed so a broken daemon can never
    /// stall a phase transition.
    pub fn notify(&self, summary: &str, body: &str) {
        if self.permission != Permission::Granted {
            debug!(
                "Skipping notification '{}' (permission {})",
                summary,
                self.permission.as_str()
            );
            return;
        }

        if let Err(e) = Notification::new()
            .summary(summary)
            .body(body)
            .timeout(0) // No auto-dismiss
            .show()
        {
            warn!("Failed to send notification: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_notify_flag_denies_permission() {
        let notifier = Notifier::request_permission(true);
        assert_eq!(notifier.permission(), Permission::Denied);
    }

    #[test]
    fn notify_without_grant_is_a_no_op() {
        // Must not panic or touch the daemon.
        let notifier = Notifier {
            permission: Permission::Default,
        };
        notifier.notify("test", "body");
    }
}
