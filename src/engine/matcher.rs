//! Entry classification
//!
//! Every active criterion is checked independently, so one entry can produce
//! several match kinds. The order is fixed: regex first, then the exact
//! directory or file name.

use regex::Regex;

use crate::core::model::{MatchKind, SearchRequest};
use crate::error::{Result, SearchError};
use crate::engine::lister::DirItem;

#[derive(Debug, Clone)]
pub struct Matcher {
    file_name: Option<String>,
    dir_name: Option<String>,
    regex: Option<Regex>,
}

impl Matcher {
    /// Compile the matchers of a request.
    ///
    /// Fails only when the pattern is not a valid regex.
    pub fn from_request(request: &SearchRequest) -> Result<Self> {
        let regex = match &request.pattern {
            Some(pattern) => Some(Regex::new(pattern).map_err(|source| {
                SearchError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                }
            })?),
            None => None,
        };

        Ok(Self {
            file_name: request.file_name.clone(),
            dir_name: request.dir_name.clone(),
            regex,
        })
    }

    /// Match kinds satisfied by `item`, in emission order
    pub fn classify(&self, item: &DirItem) -> Vec<MatchKind> {
        let mut kinds = Vec::new();

        if let Some(regex) = &self.regex {
            if regex.is_match(&item.name) {
                kinds.push(MatchKind::Regex);
            }
        }

        if item.is_dir {
            if self.dir_name.as_deref() == Some(item.name.as_str()) {
                kinds.push(MatchKind::Dir);
            }
        } else if self.file_name.as_deref() == Some(item.name.as_str()) {
            kinds.push(MatchKind::File);
        }

        kinds
    }
}
