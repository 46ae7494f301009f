//! Inline HTML for the two pages the service renders.

/// Form page served on GET `/`.
pub const FORM_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>YouTube Downloader</title>
    <style>
        body { font-family: Arial, sans-serif; max-width: 600px; margin: 2rem auto; }
        input, button { font-size: 1rem; padding: .5rem; margin: .5rem 0; width: 100%; }
    </style>
</head>
<body>
    <h1>Paste YouTube Link</h1>
    <form method="post">
        <input name="url" type="text" placeholder="https://www.youtube.com/watch?v=...">
        <button type="submit">Download</button>
    </form>
</body>
</html>
"#;

/// Success page linking the freshly fetched artifact. `name` is a minted
/// artifact name (hex stem plus extension), so it needs no HTML escaping.
pub fn ready_page(name: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>YouTube Downloader</title>
</head>
<body>
    <h1>Download Ready!</h1>
    <a href="/download/{name}" download>Click to Download Video</a>
</body>
</html>
"#
    )
}
