//! Checks on the data URLs that carry report photos and voice notes.
//! Encoding files into data URLs happens in the client; here we only make
//! sure each attachment declares the media type its slot expects.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Audio,
}

impl MediaKind {
    fn prefix(self) -> &'static str {
        match self {
            MediaKind::Image => "image/",
            MediaKind::Audio => "audio/",
        }
    }
}

/// Returns the declared MIME type of a `data:` URL.
pub fn data_url_mime(url: &str) -> Option<&str> {
    let rest = url.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    if payload.is_empty() {
        return None;
    }
    let mime = header.split(';').next()?;
    if mime.is_empty() || !mime.contains('/') {
        return None;
    }
    Some(mime)
}

pub fn check_attachment(url: &str, kind: MediaKind) -> Result<(), String> {
    match data_url_mime(url) {
        Some(mime) if mime.to_ascii_lowercase().starts_with(kind.prefix()) => Ok(()),
        Some(mime) => Err(format!("expected {}* attachment, got {mime}", kind.prefix())),
        None => Err("attachment is not a data URL".into()),
    }
}

#[cfg(test)]
mod media_tests {
    use super::*;

    #[test]
    fn reads_mime_from_data_url() {
        assert_eq!(data_url_mime("data:image/png;base64,iVBORw0"), Some("image/png"));
        assert_eq!(data_url_mime("data:audio/wav;base64,UklGR"), Some("audio/wav"));
        assert_eq!(data_url_mime("data:text/plain,hello"), Some("text/plain"));
        assert_eq!(data_url_mime("https://example.com/a.png"), None);
        assert_eq!(data_url_mime("data:image/png;base64,"), None);
        assert_eq!(data_url_mime("data:;base64,AAAA"), None);
    }

    #[test]
    fn attachments_must_match_their_slot() {
        assert!(check_attachment("data:image/jpeg;base64,/9j/4AAQ", MediaKind::Image).is_ok());
        assert!(check_attachment("data:IMAGE/PNG;base64,AAAA", MediaKind::Image).is_ok());
        assert!(check_attachment("data:audio/webm;base64,GkXf", MediaKind::Image).is_err());
        assert!(check_attachment("data:audio/webm;base64,GkXf", MediaKind::Audio).is_ok());
        assert!(check_attachment("not a url", MediaKind::Audio).is_err());
    }
}
