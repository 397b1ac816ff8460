//! The editable position input shown next to each row in sorting mode.

const INPUT_CLASS: &str = "sortable__position";

/// URL of the move endpoint for one record, below `collection_path`
/// (the path the resource's rows are listed at).
pub fn update_position_url(collection_path: &str, record_id: i64) -> String {
    format!(
        "{}/{}/sorting/update_position",
        collection_path.trim_end_matches('/'),
        record_id
    )
}

/// Renders the numeric input the admin UI binds to the move endpoint.
///
/// `display_position` is what the user sees, never the stored value.
pub fn render_position_field(
    collection_path: &str,
    record_id: i64,
    display_position: i32,
) -> String {
    let url = update_position_url(collection_path, record_id);

    format!(
        "<input type=\"number\" class=\"{INPUT_CLASS}\" value=\"{display_position}\" data-sorting-url=\"{}\" data-position=\"{display_position}\">",
        escape_attr(&url)
    )
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    out
}
