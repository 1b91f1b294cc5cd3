//! One HTTP GET hop with libcurl. Redirects are not followed here; the
//! caller re-issues the request against the returned location.

use std::cell::RefCell;
use std::path::Path;
use std::str;

use crate::storage::StorageWriter;

use super::error::FetchError;
use super::progress::FetchProgress;
use super::response::{push_header_line, ResponseHead};
use super::FetchOptions;

/// What a single hop produced.
pub(super) enum Hop {
    /// 3xx with a `Location` value (unresolved, may be relative).
    Redirect { code: u32, location: String },
    /// 2xx; the body sits in the temp file held by the writer.
    Complete(StorageWriter),
}

#[derive(Default)]
struct HopState {
    head: ResponseHead,
    writer: Option<StorageWriter>,
    storage_error: Option<String>,
    bytes_read: u64,
}

impl HopState {
    fn discard(&mut self) {
        if let Some(w) = self.writer.take() {
            w.discard();
        }
    }
}

/// Performs one GET against `url`. Body bytes are written to `temp_path`
/// only when the response is 2xx; redirect and error bodies are dropped.
pub(super) fn get_once(
    url: &str,
    temp_path: &Path,
    opts: &FetchOptions,
    progress: Option<&dyn Fn(FetchProgress)>,
) -> Result<Hop, FetchError> {
    let state = RefCell::new(HopState::default());

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(false)?;
    easy.connect_timeout(opts.connect_timeout)?;
    easy.timeout(opts.timeout)?;
    if let Some(agent) = &opts.user_agent {
        easy.useragent(agent)?;
    }

    let performed = {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(line) = str::from_utf8(data) {
                push_header_line(&mut state.borrow_mut().head, line);
            }
            true
        })?;
        transfer.write_function(|data| {
            let mut st = state.borrow_mut();
            if !st.head.is_success() {
                return Ok(data.len());
            }
            if st.writer.is_none() {
                match StorageWriter::create(temp_path) {
                    Ok(w) => st.writer = Some(w),
                    Err(e) => {
                        st.storage_error = Some(format!("{:#}", e));
                        return Ok(0); // abort transfer
                    }
                }
            }
            let appended = match st.writer.as_mut() {
                Some(w) => w.append(data),
                None => Ok(()),
            };
            if let Err(e) = appended {
                tracing::warn!(url, "asset write failed: {}", e);
                st.storage_error = Some(format!("write {}: {}", temp_path.display(), e));
                return Ok(0);
            }
            st.bytes_read += data.len() as u64;
            let snapshot = FetchProgress {
                bytes_read: st.bytes_read,
                total_bytes: st.head.content_length.unwrap_or(0),
            };
            drop(st);
            if let Some(report) = progress {
                report(snapshot);
            }
            Ok(data.len())
        })?;
        transfer.perform()
    };

    let mut st = state.into_inner();
    if let Err(e) = performed {
        st.discard();
        if let Some(msg) = st.storage_error.take() {
            return Err(FetchError::Storage(msg));
        }
        return Err(FetchError::Curl(e));
    }

    let code = match st.head.status {
        Some(code) => code,
        None => easy.response_code()?,
    };

    if super::response::is_redirect_status(code) {
        st.discard();
        return match st.head.location.take() {
            Some(location) => Ok(Hop::Redirect { code, location }),
            None => Err(FetchError::MissingLocation { code }),
        };
    }

    if !(200..300).contains(&code) {
        st.discard();
        return Err(FetchError::Http { code });
    }

    let writer = match st.writer.take() {
        Some(w) => w,
        // Empty 2xx body: still materialize an (empty) file.
        None => StorageWriter::create(temp_path).map_err(|e| FetchError::Storage(format!("{:#}", e)))?,
    };
    Ok(Hop::Complete(writer))
}
