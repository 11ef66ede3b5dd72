//! # Image Generation
//!
//! Prompt in, `data:<mime>;base64,<data>` out. Any failure (no key, HTTP
//! error, no image in the answer) yields `None` so callers can fall back to
//! a placeholder picture.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;
use ts_rs::TS;

use crate::backend::{GenerateRequest, GenerationConfig, GenerativeBackend, ImageConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
    #[serde(rename = "4:3")]
    Standard,
    #[serde(rename = "3:4")]
    StandardPortrait,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
            AspectRatio::Standard => "4:3",
            AspectRatio::StandardPortrait => "3:4",
        }
    }
}

impl FromStr for AspectRatio {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const ALL: [AspectRatio; 5] = [
            AspectRatio::Square,
            AspectRatio::Landscape,
            AspectRatio::Portrait,
            AspectRatio::Standard,
            AspectRatio::StandardPortrait,
        ];
        ALL.into_iter()
            .find(|r| r.as_str() == s.trim())
            .ok_or_else(|| format!("unsupported aspect ratio '{}'", s.trim()))
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct ImageGenerator {
    backend: Option<Arc<dyn GenerativeBackend>>,
    model: String,
}

impl ImageGenerator {
    pub fn new(backend: Option<Arc<dyn GenerativeBackend>>, model: String) -> Self {
        Self { backend, model }
    }

    pub async fn generate(&self, prompt: &str, aspect_ratio: AspectRatio) -> Option<String> {
        let backend = self.backend.as_deref()?;

        let mut request = GenerateRequest::from_prompt(prompt);
        request.generation_config = Some(GenerationConfig {
            image_config: Some(ImageConfig {
                aspect_ratio: aspect_ratio.to_string(),
            }),
            ..Default::default()
        });

        match backend.generate(&self.model, &request).await {
            Ok(response) => {
                let url = response.inline_data().map(|data| data.to_data_url());
                if url.is_none() {
                    warn!(model = %self.model, "Image response carried no image");
                }
                url
            }
            Err(err) => {
                warn!(model = %self.model, error = %err, "Image generation failed");
                None
            }
        }
    }

    /// Catalog picture for a product.
    pub async fn product_photo(&self, product_name: &str) -> Option<String> {
        let prompt =
            format!("Professional product photo of {product_name}, white background, studio light.");
        self.generate(&prompt, AspectRatio::Square).await
    }

    /// Point-of-view shot of someone scanning the product on a shelf.
    pub async fn simulated_scan(&self, product_name: &str) -> Option<String> {
        let prompt = format!(
            "POV holding \"{product_name}\" package in supermarket. Focus on QR code. Photorealistic."
        );
        self.generate(&prompt, AspectRatio::Landscape).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Candidate, Content, GenerateResponse, InlineData, Part};
    use crate::rotation::testing::*;

    fn image_reply() -> GenerateResponse {
        GenerateResponse {
            candidates: vec![Candidate {
                content: Some(Content {
                    role: Some("model".to_string()),
                    parts: vec![Part {
                        text: None,
                        inline_data: Some(InlineData {
                            mime_type: "image/png".to_string(),
                            data: "AAAA".to_string(),
                        }),
                    }],
                }),
            }],
        }
    }

    fn generator(backend: &Arc<FakeBackend>) -> ImageGenerator {
        let backend: Arc<dyn GenerativeBackend> = backend.clone();
        ImageGenerator::new(Some(backend), "image-model".to_string())
    }

    #[test]
    fn test_aspect_ratio_parsing() {
        assert_eq!("16:9".parse::<AspectRatio>(), Ok(AspectRatio::Landscape));
        assert_eq!(" 3:4 ".parse::<AspectRatio>(), Ok(AspectRatio::StandardPortrait));
        assert!("2:1".parse::<AspectRatio>().is_err());
    }

    #[tokio::test]
    async fn test_product_photo_returns_data_url() {
        let backend = Arc::new(FakeBackend::new(vec![Ok(image_reply())]));
        let url = generator(&backend).product_photo("Arroz Diana").await;

        assert_eq!(url.as_deref(), Some("data:image/png;base64,AAAA"));
        let request = &backend.requests()[0];
        assert_eq!(
            request.contents[0].text(),
            "Professional product photo of Arroz Diana, white background, studio light."
        );
        let ratio = &request.generation_config.as_ref().unwrap().image_config;
        assert_eq!(ratio.as_ref().unwrap().aspect_ratio, "1:1");
        assert_eq!(backend.models_called(), vec!["image-model"]);
    }

    #[tokio::test]
    async fn test_simulated_scan_is_landscape() {
        let backend = Arc::new(FakeBackend::new(vec![Ok(image_reply())]));
        generator(&backend).simulated_scan("Leche").await;

        let request = &backend.requests()[0];
        assert!(request.contents[0].text().contains("POV holding \"Leche\""));
        let config = request.generation_config.as_ref().unwrap();
        assert_eq!(config.image_config.as_ref().unwrap().aspect_ratio, "16:9");
    }

    #[tokio::test]
    async fn test_failures_yield_none() {
        let backend = Arc::new(FakeBackend::new(vec![text("sin imagen"), quota()]));
        let images = generator(&backend);

        assert!(images.generate("x", AspectRatio::Portrait).await.is_none());
        assert!(images.generate("x", AspectRatio::Portrait).await.is_none());
        assert!(ImageGenerator::new(None, "m".into())
            .product_photo("Arroz")
            .await
            .is_none());
    }
}
