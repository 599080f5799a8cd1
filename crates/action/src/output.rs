use serde::Serialize;

use crate::request::Response;

/// What a successful `perform` produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionOutput {
    /// A cloud action's vendor response.
    Http { response: Response },
    /// A device action handed its call to the SDK.
    Sdk,
}

impl ActionOutput {
    pub fn http(response: Response) -> Self {
        Self::Http { response }
    }

    /// The vendor response, for cloud actions.
    pub fn response(&self) -> Option<&Response> {
        match self {
            Self::Http { response } => Some(response),
            Self::Sdk => None,
        }
    }
}
