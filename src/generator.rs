use rand::Rng;
use rand::seq::SliceRandom;

/// Side lengths an image placeholder can be rendered at.
pub const IMAGE_SIDES: [u32; 3] = [512, 768, 1024];

/// Prompt text carried into the dummyimage caption is cut to this many characters.
const CAPTION_CHARS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextTemplate {
    prefix: &'static str,
    suffix: &'static str,
}

impl TextTemplate {
    pub const ALL: [TextTemplate; 5] = [
        TextTemplate {
            prefix: "That's an interesting point about '",
            suffix: "'. Let me elaborate on that concept.",
        },
        TextTemplate {
            prefix: "I understand you're asking about '",
            suffix: "'. Here's my perspective on this topic.",
        },
        TextTemplate {
            prefix: "Regarding '",
            suffix: "', I think there are several important aspects to consider.",
        },
        TextTemplate {
            prefix: "Your message about '",
            suffix: "' reminds me of similar concepts in AI and technology.",
        },
        TextTemplate {
            prefix: "Thank you for sharing '",
            suffix: "'. This is a fascinating area to explore further.",
        },
    ];

    pub fn render(&self, message: &str) -> String {
        format!("{}{}{}", self.prefix, message, self.suffix)
    }

    /// True when `text` is this template rendered with `message`.
    #[cfg(test)]
    pub fn matches(&self, text: &str, message: &str) -> bool {
        text.strip_prefix(self.prefix)
            .and_then(|rest| rest.strip_suffix(self.suffix))
            .is_some_and(|inner| inner == message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageService {
    Picsum,
    Placeholder,
    DummyImage,
}

impl ImageService {
    pub const ALL: [ImageService; 3] = [
        ImageService::Picsum,
        ImageService::Placeholder,
        ImageService::DummyImage,
    ];

    /// Builds the URL for this service. Only picsum consumes `rng`, for its cache-buster.
    pub fn render<R: Rng + ?Sized>(&self, rng: &mut R, width: u32, height: u32, prompt: &str) -> String {
        match self {
            ImageService::Picsum => format!(
                "https://picsum.photos/{}/{}?random={}",
                width,
                height,
                rng.gen_range(1..=1000)
            ),
            ImageService::Placeholder => format!(
                "https://via.placeholder.com/{}x{}/4338ca/ffffff?text=AI+Generated+Image",
                width, height
            ),
            ImageService::DummyImage => format!(
                "https://dummyimage.com/{}x{}/6366f1/ffffff.png&text={}",
                width,
                height,
                caption(prompt)
            ),
        }
    }
}

/// First 20 characters of the prompt with spaces turned into `+`.
pub fn caption(prompt: &str) -> String {
    prompt
        .chars()
        .take(CAPTION_CHARS)
        .map(|c| if c == ' ' { '+' } else { c })
        .collect()
}

pub fn pick_text_template<R: Rng + ?Sized>(rng: &mut R) -> TextTemplate {
    *TextTemplate::ALL
        .choose(rng)
        .unwrap_or(&TextTemplate::ALL[0])
}

pub fn text_response<R: Rng + ?Sized>(rng: &mut R, message: &str) -> String {
    pick_text_template(rng).render(message)
}

pub fn image_url<R: Rng + ?Sized>(rng: &mut R, prompt: &str) -> String {
    let width = *IMAGE_SIDES.choose(rng).unwrap_or(&IMAGE_SIDES[0]);
    let height = *IMAGE_SIDES.choose(rng).unwrap_or(&IMAGE_SIDES[0]);
    let service = *ImageService::ALL
        .choose(rng)
        .unwrap_or(&ImageService::ALL[0]);
    service.render(rng, width, height, prompt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use regex::Regex;
    use std::collections::HashSet;

    fn url_patterns() -> Vec<(ImageService, Regex)> {
        vec![
            (
                ImageService::Picsum,
                Regex::new(r"^https://picsum\.photos/(512|768|1024)/(512|768|1024)\?random=(\d+)$").unwrap(),
            ),
            (
                ImageService::Placeholder,
                Regex::new(r"^https://via\.placeholder\.com/(512|768|1024)x(512|768|1024)/4338ca/ffffff\?text=AI\+Generated\+Image$").unwrap(),
            ),
            (
                ImageService::DummyImage,
                Regex::new(r"^https://dummyimage\.com/(512|768|1024)x(512|768|1024)/6366f1/ffffff\.png&text=(.*)$").unwrap(),
            ),
        ]
    }

    #[test]
    fn test_text_templates_render_message_verbatim() {
        let rendered = TextTemplate::ALL[2].render("hello");
        assert_eq!(
            rendered,
            "Regarding 'hello', I think there are several important aspects to consider."
        );
        assert!(TextTemplate::ALL[2].matches(&rendered, "hello"));
        assert!(!TextTemplate::ALL[0].matches(&rendered, "hello"));
    }

    #[test]
    fn test_text_response_contains_message() {
        let mut rng = StdRng::seed_from_u64(7);
        for message in ["", "hello", "it's a 'quoted' thing", "多字节 ✓"] {
            let out = text_response(&mut rng, message);
            assert!(out.contains(message));
            assert_eq!(
                TextTemplate::ALL.iter().filter(|t| t.matches(&out, message)).count(),
                1,
                "unexpected output: {}",
                out
            );
        }
    }

    #[test]
    fn test_text_response_covers_all_templates() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = HashSet::new();
        for _ in 0..200 {
            let out = text_response(&mut rng, "coverage");
            let idx = TextTemplate::ALL
                .iter()
                .position(|t| t.matches(&out, "coverage"))
                .expect("output did not match any template");
            seen.insert(idx);
        }
        assert_eq!(seen.len(), TextTemplate::ALL.len());
    }

    #[test]
    fn test_image_url_matches_a_known_service() {
        let patterns = url_patterns();
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen = HashSet::new();
        for _ in 0..200 {
            let url = image_url(&mut rng, "a red fox in the snow at dusk");
            let (service, caps) = patterns
                .iter()
                .find_map(|(s, re)| re.captures(&url).map(|c| (*s, c)))
                .unwrap_or_else(|| panic!("unrecognised url: {}", url));
            match service {
                ImageService::Picsum => {
                    let r: u32 = caps[3].parse().unwrap();
                    assert!((1..=1000).contains(&r));
                }
                ImageService::DummyImage => assert_eq!(&caps[3], "a+red+fox+in+the+sno"),
                ImageService::Placeholder => {}
            }
            seen.insert(service);
        }
        assert_eq!(seen.len(), ImageService::ALL.len());
    }

    #[test]
    fn test_image_sides_cover_every_size() {
        let re = Regex::new(r"(512|768|1024)[x/](512|768|1024)").unwrap();
        let mut rng = StdRng::seed_from_u64(99);
        let mut widths = HashSet::new();
        let mut heights = HashSet::new();
        for _ in 0..200 {
            let url = image_url(&mut rng, "sizes");
            let caps = re.captures(&url).unwrap();
            widths.insert(caps[1].to_string());
            heights.insert(caps[2].to_string());
        }
        assert_eq!(widths.len(), 3);
        assert_eq!(heights.len(), 3);
    }

    #[test]
    fn test_caption_truncates_by_characters() {
        assert_eq!(caption("short one"), "short+one");
        assert_eq!(caption(""), "");
        assert_eq!(caption("abcdefghij klmnopqrstuvwxyz"), "abcdefghij+klmnopqrs");
        // 25 two-byte chars; slicing by bytes would split one
        let wide = "é".repeat(25);
        assert_eq!(caption(&wide).chars().count(), 20);
    }

    #[test]
    fn test_fixed_services_ignore_prompt() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(
            ImageService::Placeholder.render(&mut rng, 768, 512, "ignored"),
            "https://via.placeholder.com/768x512/4338ca/ffffff?text=AI+Generated+Image"
        );
        assert_eq!(
            ImageService::DummyImage.render(&mut rng, 1024, 1024, "cat hat"),
            "https://dummyimage.com/1024x1024/6366f1/ffffff.png&text=cat+hat"
        );
    }
}
