//! Shared helpers: fake fetch tools, scratch dirs, request plumbing.

use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use axum::Router;
use filetime::FileTime;
use http_body_util::BodyExt;
use tower::ServiceExt;

use vidchute_core::artifact::ArtifactStore;
use vidchute_core::config::{FetchConfig, VidchuteConfig};
use vidchute_server::app::{build_router, AppState};

/// Install an executable shell script into `dir` and return its path.
pub fn write_tool(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.join("fake-fetch");
    std::fs::write(&path, body).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

pub fn invocation_log(dir: &Path) -> PathBuf {
    dir.join("invocations.log")
}

// Every fake tool starts with this: record argv (tab-separated, one line per
// invocation) and leave the `-o` argument in $out.
fn script_prolog(log: &Path) -> String {
    format!(
        r#"#!/bin/sh
printf '%s\t' "$@" >> {log}
printf '\n' >> {log}
out=""
prev=""
for a in "$@"; do
  [ "$prev" = "-o" ] && out="$a"
  prev="$a"
done
"#,
        log = log.display()
    )
}

/// Fake tool that writes `content` at the `-o` path and exits 0.
pub fn succeeding_tool(dir: &Path, content: &str) -> PathBuf {
    let script = format!(
        "{prolog}printf '{content}' > \"$out\"\nexit 0\n",
        prolog = script_prolog(&invocation_log(dir)),
        content = content
    );
    write_tool(dir, &script)
}

/// Fake tool that leaves partial output (plus a `.part` sibling) and exits 1.
pub fn failing_tool(dir: &Path) -> PathBuf {
    let script = format!(
        "{prolog}printf 'partial' > \"$out\"\nprintf 'frag' > \"$out.part\"\necho 'ERROR: no video' >&2\nexit 1\n",
        prolog = script_prolog(&invocation_log(dir))
    );
    write_tool(dir, &script)
}

/// Fake tool that writes partial output and then sleeps past any test timeout.
pub fn hanging_tool(dir: &Path) -> PathBuf {
    let script = format!(
        "{prolog}printf 'partial' > \"$out\"\nsleep 5\nexit 0\n",
        prolog = script_prolog(&invocation_log(dir))
    );
    write_tool(dir, &script)
}

/// Fake tool that waits before writing its output, then exits 0.
pub fn slow_tool(dir: &Path, content: &str, delay_secs: u64) -> PathBuf {
    let script = format!(
        "{prolog}sleep {delay_secs}\nprintf '{content}' > \"$out\"\nexit 0\n",
        prolog = script_prolog(&invocation_log(dir))
    );
    write_tool(dir, &script)
}

/// Argv recorded by the fake tool, one `Vec` per invocation.
pub fn invocations(dir: &Path) -> Vec<Vec<String>> {
    match std::fs::read_to_string(invocation_log(dir)) {
        Ok(text) => text
            .lines()
            .map(|line| {
                line.split('\t')
                    .filter(|field| !field.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .collect(),
        Err(_) => Vec::new(),
    }
}

/// Router over `scratch` using the fake tool, with a short fetch timeout.
pub fn app(scratch: &Path, tool: &Path) -> Router {
    app_with_timeout(scratch, tool, 5)
}

pub fn app_with_timeout(scratch: &Path, tool: &Path, timeout_secs: u64) -> Router {
    let mut cfg = VidchuteConfig::default();
    cfg.scratch_dir = Some(scratch.to_path_buf());
    cfg.fetch = Some(FetchConfig {
        program: tool.display().to_string(),
        format: "bv*+ba/b".to_string(),
        timeout_secs,
    });
    let store = ArtifactStore::open(scratch).unwrap();
    build_router(AppState::new(&cfg, store))
}

pub async fn get(router: &Router, uri: &str) -> Response {
    router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_form(router: &Router, uri: &str, body: &str) -> Response {
    router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn body_string(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Pull the `/download/...` href out of a success page.
pub fn download_href(html: &str) -> String {
    let start = html.find("/download/").expect("download link present");
    let rest = &html[start..];
    let end = rest.find('"').expect("closing quote");
    rest[..end].to_string()
}

/// Regular file names currently in `dir`, sorted.
pub fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.path().is_file())
                .map(|entry| entry.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

/// Set a file's mtime `secs` seconds into the past.
pub fn backdate(path: &Path, secs: u64) {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs();
    filetime::set_file_mtime(path, FileTime::from_unix_time((now - secs) as i64, 0)).unwrap();
}
