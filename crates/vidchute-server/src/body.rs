//! Response body for the one-shot artifact serve.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderValue};
use axum::response::Response;
use futures_util::Stream;
use tokio_util::io::ReaderStream;

use vidchute_core::artifact::{ArtifactName, RemoveOnDrop, ServedArtifact};

/// File chunks with the removal guard riding along: when hyper drops the
/// body (sent to completion, client gone, or errored), the guard drops and
/// the artifact is removed.
struct CleanupStream {
    inner: ReaderStream<tokio::fs::File>,
    _cleanup: RemoveOnDrop,
}

impl Stream for CleanupStream {
    type Item = io::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.get_mut().inner).poll_next(cx)
    }
}

/// Build the attachment response for a served artifact.
pub fn attachment_response(name: &ArtifactName, served: ServedArtifact) -> Response {
    let mime = mime_guess::from_path(name.as_str()).first_or_octet_stream();
    let disposition = format!("attachment; filename=\"{name}\"");

    let stream = CleanupStream {
        inner: ReaderStream::new(served.file),
        _cleanup: served.cleanup,
    };
    let mut response = Response::new(Body::from_stream(stream));
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(mime.as_ref())
            .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream")),
    );
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(served.len));
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .unwrap_or_else(|_| HeaderValue::from_static("attachment")),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use vidchute_core::artifact::ArtifactStore;

    #[tokio::test]
    async fn streams_bytes_then_removes_file() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ArtifactStore::open(tmp.path()).unwrap();
        let name = ArtifactName::mint("mp4");
        let path = store.path_of(&name);
        std::fs::write(&path, b"movie bytes").unwrap();

        let served = store.open_for_serve(&name).await.unwrap().unwrap();
        let response = attachment_response(&name, served);

        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "video/mp4"
        );
        assert_eq!(
            response.headers().get(header::CONTENT_LENGTH).unwrap(),
            "11"
        );
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(disposition.starts_with("attachment"));
        assert!(disposition.contains(name.as_str()));

        let bytes = response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes();
        assert_eq!(&bytes[..], b"movie bytes");
        assert!(!path.exists());
    }
}
