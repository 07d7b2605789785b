mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::Result;
use flate2::read::GzDecoder;
use std::io::Read;

/// Downloads a trip data source over HTTP.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?;
    Ok(resp.bytes().await?.to_vec())
}

/// Gunzips fetched bytes when the source name marks them as compressed.
///
/// Published trip exports are often `.csv.gz`; servers hand those out as
/// opaque bytes, so content-encoding negotiation does not cover them.
pub fn maybe_gunzip(source: &str, bytes: Vec<u8>) -> Result<Vec<u8>> {
    if !source.ends_with(".gz") {
        return Ok(bytes);
    }

    let mut decoded = Vec::new();
    GzDecoder::new(bytes.as_slice()).read_to_end(&mut decoded)?;
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    #[test]
    fn test_maybe_gunzip_passes_plain_sources_through() {
        let bytes = b"a,b,c".to_vec();
        assert_eq!(maybe_gunzip("trips.csv", bytes.clone()).unwrap(), bytes);
    }

    #[test]
    fn test_maybe_gunzip_decodes_gz_sources() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"a,b,c").unwrap();
        let compressed = encoder.finish().unwrap();

        let decoded = maybe_gunzip("trips.csv.gz", compressed).unwrap();
        assert_eq!(decoded, b"a,b,c");
    }

    #[test]
    fn test_maybe_gunzip_rejects_corrupt_gz() {
        assert!(maybe_gunzip("trips.csv.gz", vec![0xFF, 0x00, 0x12]).is_err());
    }
}
