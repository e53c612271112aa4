use chrono::NaiveDateTime;

/// Second-precision LaTiS query timestamp, no timezone suffix.
const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub(crate) fn format_query_time(t: NaiveDateTime) -> String {
    t.format(TIME_FORMAT).to_string()
}

pub(crate) fn trailing_path_segment(url: &str) -> Option<String> {
    let path = url.split('?').next().unwrap_or(url);
    path.rsplit('/').next().and_then(|s| {
        if s.is_empty() {
            None
        } else {
            Some(s.to_string())
        }
    })
}
