//! In-memory page for tests and the demo suite.
//!
//! Elements are keyed by their selector string. Waits resolve immediately:
//! a condition that does not hold fails with [`PageError::Timeout`] without
//! sleeping. Screenshots render the page URL and its visible elements into a
//! small framebuffer and encode it as PNG.

use font8x8::{BASIC_FONTS, UnicodeFonts};
use image::{ImageBuffer, RgbImage};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use super::page::{LoadState, Page, PageError, PageResult, WaitState};

const BACKGROUND: [u8; 3] = [255, 255, 255];
const HEADER: [u8; 3] = [40, 44, 52];
const HEADER_TEXT: [u8; 3] = [230, 230, 230];
const ELEMENT_TEXT: [u8; 3] = [20, 20, 20];
const LINE_HEIGHT: u32 = 12;

#[derive(Debug, Clone, Default)]
struct MockElement {
    visible: bool,
    value: String,
}

/// A scripted stand-in for a real browser page
#[derive(Debug, Clone)]
pub struct MockPage {
    url: String,
    elements: BTreeMap<String, MockElement>,
    /// selector -> URL reached by clicking it
    links: BTreeMap<String, String>,
    clicks: Vec<String>,
    closed: bool,
    width: u32,
    height: u32,
}

impl MockPage {
    /// Create a page already showing `url`
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            elements: BTreeMap::new(),
            links: BTreeMap::new(),
            clicks: Vec::new(),
            closed: false,
            width: 640,
            height: 360,
        }
    }

    /// Add a visible element
    pub fn with_element(mut self, selector: impl Into<String>) -> Self {
        self.elements.insert(
            selector.into(),
            MockElement {
                visible: true,
                ..Default::default()
            },
        );
        self
    }

    /// Add an element that exists but never becomes visible
    pub fn with_hidden_element(mut self, selector: impl Into<String>) -> Self {
        self.elements.insert(selector.into(), MockElement::default());
        self
    }

    /// Clicking `selector` navigates to `url`
    pub fn with_link(mut self, selector: impl Into<String>, url: impl Into<String>) -> Self {
        let selector = selector.into();
        self.elements.entry(selector.clone()).or_default().visible = true;
        self.links.insert(selector, url.into());
        self
    }

    /// Set the rendered screenshot size in pixels
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Selectors clicked so far, in order
    pub fn clicks(&self) -> &[String] {
        &self.clicks
    }

    fn ensure_open(&self) -> PageResult<()> {
        if self.closed {
            Err(PageError::Closed)
        } else {
            Ok(())
        }
    }

    fn visible_element(&self, selector: &str, timeout: Duration) -> PageResult<&MockElement> {
        self.ensure_open()?;
        match self.elements.get(selector) {
            Some(element) if element.visible => Ok(element),
            _ => Err(PageError::timeout(selector, timeout)),
        }
    }

    fn render(&self) -> RgbImage {
        let mut img: RgbImage = ImageBuffer::from_pixel(self.width, self.height, image::Rgb(BACKGROUND));
        fill_rect(&mut img, 0, 0, self.width, LINE_HEIGHT + 8, HEADER);
        draw_text(&mut img, 6, 6, &self.url, HEADER_TEXT, HEADER);

        let mut y = LINE_HEIGHT + 16;
        for (selector, element) in self.elements.iter().filter(|(_, e)| e.visible) {
            if y + 8 > self.height {
                break;
            }
            let line = if element.value.is_empty() {
                selector.clone()
            } else {
                format!("{} = {}", selector, element.value)
            };
            draw_text(&mut img, 6, y, &line, ELEMENT_TEXT, BACKGROUND);
            y += LINE_HEIGHT;
        }
        img
    }
}

impl Page for MockPage {
    fn navigate(&mut self, url: &str, _timeout: Duration) -> PageResult<()> {
        self.ensure_open()?;
        self.url = url.to_string();
        Ok(())
    }

    fn wait_for(&self, selector: &str, state: WaitState, timeout: Duration) -> PageResult<()> {
        self.ensure_open()?;
        let element = self.elements.get(selector);
        let reached = match state {
            WaitState::Attached => element.is_some(),
            WaitState::Detached => element.is_none(),
            WaitState::Visible => element.map(|e| e.visible).unwrap_or(false),
            WaitState::Hidden => element.map(|e| !e.visible).unwrap_or(true),
        };
        if reached {
            Ok(())
        } else {
            Err(PageError::timeout(selector, timeout))
        }
    }

    fn fill(&mut self, selector: &str, value: &str, timeout: Duration) -> PageResult<()> {
        self.visible_element(selector, timeout)?;
        if let Some(element) = self.elements.get_mut(selector) {
            element.value = value.to_string();
        }
        Ok(())
    }

    fn click(&mut self, selector: &str, timeout: Duration) -> PageResult<()> {
        self.visible_element(selector, timeout)?;
        self.clicks.push(selector.to_string());
        if let Some(url) = self.links.get(selector) {
            self.url = url.clone();
        }
        Ok(())
    }

    fn input_value(&self, selector: &str, timeout: Duration) -> PageResult<String> {
        Ok(self.visible_element(selector, timeout)?.value.clone())
    }

    fn current_url(&self) -> PageResult<String> {
        self.ensure_open()?;
        Ok(self.url.clone())
    }

    fn wait_for_load_state(&self, _state: LoadState, _timeout: Duration) -> PageResult<()> {
        self.ensure_open()
    }

    fn screenshot(&self, path: &Path, _full_page: bool) -> PageResult<()> {
        self.ensure_open()?;
        self.render()
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|e| PageError::Other(format!("Failed to encode PNG: {}", e)))
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

fn fill_rect(img: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: [u8; 3]) {
    for py in y..(y + h).min(img.height()) {
        for px in x..(x + w).min(img.width()) {
            img.put_pixel(px, py, image::Rgb(color));
        }
    }
}

/// Draw text using font8x8 glyphs. Each character is 8x8 pixels and text does not wrap.
fn draw_text(img: &mut RgbImage, x: u32, y: u32, text: &str, fg: [u8; 3], bg: [u8; 3]) {
    let mut cursor_x = x;
    for ch in text.chars() {
        if cursor_x + 8 > img.width() {
            break;
        }
        let glyph = BASIC_FONTS.get(ch).unwrap_or([0u8; 8]);
        for (row_idx, row) in glyph.iter().enumerate() {
            let py = y + row_idx as u32;
            if py >= img.height() {
                break;
            }
            for bit in 0..8 {
                // font8x8 stores LSB as leftmost pixel
                let color = if (row >> bit) & 1 == 1 { fg } else { bg };
                img.put_pixel(cursor_x + bit, py, image::Rgb(color));
            }
        }
        cursor_x += 8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: Duration = Duration::from_millis(100);

    #[test]
    fn test_fill_and_read_back() {
        let mut page = MockPage::new("https://example.test/login").with_element("#email");
        page.fill("#email", "test@example.com", T).unwrap();
        assert_eq!(page.input_value("#email", T).unwrap(), "test@example.com");
    }

    #[test]
    fn test_missing_element_times_out() {
        let mut page = MockPage::new("https://example.test");
        let err = page.click("#nope", T).unwrap_err();
        assert!(err.is_timeout());
        assert!(page.wait_for("#nope", WaitState::Detached, T).is_ok());
        assert!(page.wait_for("#nope", WaitState::Hidden, T).is_ok());
    }

    #[test]
    fn test_hidden_element_is_attached_but_not_visible() {
        let page = MockPage::new("https://example.test").with_hidden_element("#spinner");
        assert!(page.wait_for("#spinner", WaitState::Attached, T).is_ok());
        assert!(page.wait_for("#spinner", WaitState::Visible, T).unwrap_err().is_timeout());
    }

    #[test]
    fn test_link_click_navigates() {
        let mut page = MockPage::new("https://example.test/login")
            .with_link("button:has-text(\"Login\")", "https://example.test/welcome");
        page.click("button:has-text(\"Login\")", T).unwrap();
        assert_eq!(page.current_url().unwrap(), "https://example.test/welcome");
        assert_eq!(page.clicks(), &["button:has-text(\"Login\")".to_string()]);
    }

    #[test]
    fn test_closed_page_rejects_everything() {
        let mut page = MockPage::new("https://example.test").with_element("#a");
        page.close();
        assert!(page.is_closed());
        assert!(matches!(page.current_url(), Err(PageError::Closed)));
        assert!(matches!(page.click("#a", T), Err(PageError::Closed)));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.png");
        assert!(matches!(page.screenshot(&path, true), Err(PageError::Closed)));
        assert!(!path.exists());
    }

    #[test]
    fn test_screenshot_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.png");
        let page = MockPage::new("https://example.test")
            .with_element("h1:has-text(\"Login\")")
            .with_size(200, 100);
        page.screenshot(&path, true).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        // PNG magic bytes
        assert_eq!(&bytes[0..4], &[0x89, 0x50, 0x4E, 0x47]);
        let img = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert_eq!((img.width(), img.height()), (200, 100));
        assert_eq!(img.get_pixel(199, 99).0, BACKGROUND);
    }
}
