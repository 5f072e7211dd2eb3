use anyhow::{anyhow, Context, Result};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadProgress {
    pub downloaded: u64,
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadResult {
    pub path: PathBuf,
    pub bytes: u64,
}

/// Stream `url` into `dest`. Data lands in `<dest>.part` first and is renamed on completion.
pub async fn download_to<F>(http: &reqwest::Client, url: &str, dest: &Path, mut on_progress: F) -> Result<DownloadResult>
where
    F: FnMut(&DownloadProgress),
{
    let resp = http.get(url).send().await.with_context(|| format!("requesting {url}"))?;
    let status = resp.status();
    if !status.is_success() {
        return Err(anyhow!("download of {url} failed with {status}"));
    }
    let total = resp.content_length();

    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let part = part_path(dest);
    let downloaded = match write_body(resp, &part, total, &mut on_progress).await {
        Ok(n) => n,
        Err(e) => {
            let _ = tokio::fs::remove_file(&part).await;
            return Err(e).with_context(|| format!("downloading {url}"));
        }
    };

    tokio::fs::rename(&part, dest)
        .await
        .with_context(|| format!("moving {} into place", part.display()))?;
    tracing::info!(%url, path = %dest.display(), bytes = downloaded, "download complete");
    Ok(DownloadResult { path: dest.to_path_buf(), bytes: downloaded })
}

async fn write_body<F>(resp: reqwest::Response, part: &Path, total: Option<u64>, on_progress: &mut F) -> Result<u64>
where
    F: FnMut(&DownloadProgress),
{
    let mut file = tokio::fs::File::create(part)
        .await
        .with_context(|| format!("creating {}", part.display()))?;
    let mut downloaded = 0u64;
    let mut stream = resp.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.context("reading response body")?;
        file.write_all(&chunk).await.with_context(|| format!("writing {}", part.display()))?;
        downloaded += chunk.len() as u64;
        on_progress(&DownloadProgress { downloaded, total });
    }
    file.flush().await.with_context(|| format!("flushing {}", part.display()))?;
    Ok(downloaded)
}

fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".part");
    dest.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn failed_write_removes_part_file() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_bytes(vec![1u8; 256 * 1024]))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("fna-video-x.mp4");
        let part = part_path(&dest);
        // writes to /dev/full fail with ENOSPC
        std::os::unix::fs::symlink("/dev/full", &part).unwrap();

        let http = reqwest::Client::new();
        let res = download_to(&http, &format!("{}/v", server.uri()), &dest, |_| {}).await;
        assert!(res.is_err());
        assert!(std::fs::symlink_metadata(&part).is_err());
        assert!(!dest.exists());
    }

    #[test]
    fn part_file_sits_next_to_target() {
        assert_eq!(part_path(Path::new("/tmp/x/fna-video-1.mp4")), PathBuf::from("/tmp/x/fna-video-1.mp4.part"));
    }
}
