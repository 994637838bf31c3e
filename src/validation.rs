use url::Url;

use crate::errors::BackendError;
use crate::recommendation::NewRecommendation;

/// Hosts accepted as video links.
const VIDEO_HOSTS: &[&str] = &["youtube.com", "www.youtube.com", "m.youtube.com", "youtu.be"];

/// Checks a submission before it reaches the scoring engine: the name
/// must be non-empty after normalization and the link must point at a
/// recognized video host.
pub fn validate(submission: &NewRecommendation) -> Result<(), BackendError> {
    if submission.name.is_empty() {
        return Err(BackendError::MissingName);
    }

    parse_video_link(&submission.link).map(|_| ())
}

/// Parses a link and checks it against the recognized video hosts. The
/// link must carry a path or query beyond the bare host.
pub fn parse_video_link(link: &str) -> Result<Url, BackendError> {
    let invalid = || BackendError::InvalidLink(link.to_owned());

    let url = Url::parse(link).map_err(|_| invalid())?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(invalid()),
    }

    match url.host_str() {
        Some(host) if VIDEO_HOSTS.contains(&host) => {}
        _ => return Err(invalid()),
    }

    if url.path().len() <= 1 && url.query().is_none() {
        return Err(invalid());
    }

    Ok(url)
}
