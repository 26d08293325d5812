use crate::error::{BotError, Result};
use reqwest::Client;
use std::future::Future;
use tracing::debug;

/// Source of raw image bytes for avatar layers.
pub trait ImageFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        debug!("Fetching image {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BotError::Status {
                status,
                url: url.to_string(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

/// Natural width and height of an encoded image.
pub fn measure_image(bytes: &[u8]) -> Result<(u32, u32)> {
    let image = image::load_from_memory(bytes)?;
    Ok((image.width(), image.height()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbaImage};
    use std::io::Cursor;

    #[test]
    fn measures_encoded_png() {
        let mut bytes = Vec::new();
        RgbaImage::new(7, 3)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        assert_eq!(measure_image(&bytes).unwrap(), (7, 3));
    }

    #[test]
    fn garbage_is_an_image_error() {
        assert!(matches!(
            measure_image(b"not an image").unwrap_err(),
            BotError::Image(_)
        ));
    }
}
