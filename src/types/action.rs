use std::fmt;

use serde::{Deserialize, Serialize};

/// What a WAF rule does with a request whose statement matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Reject the request. Terminal.
    Block,
    /// Accept the request. Terminal.
    Allow,
    /// Record the match (and attach labels) and keep evaluating.
    Count,
    /// Present a CAPTCHA or silent challenge.
    CaptchaOrChallenge,
    /// Rule-group reference whose managed action is overridden.
    OverrideManaged,
}

impl Action {
    /// Terminal actions stop rule evaluation for the request, so no later
    /// rule ever observes the labels they attach.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Action::Block | Action::Allow)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Block => write!(f, "Block"),
            Action::Allow => write!(f, "Allow"),
            Action::Count => write!(f, "Count"),
            Action::CaptchaOrChallenge => write!(f, "CaptchaOrChallenge"),
            Action::OverrideManaged => write!(f, "OverrideManaged"),
        }
    }
}
