//! Embedded sample document, used when no input file is given.

/// Demo document: two rects and a circle, one addressable by id and one by
/// class.
pub const SAMPLE_SVG: &str = r#"<svg width="300" height="300" xmlns="http://www.w3.org/2000/svg">
  <rect id="hero" x="50" y="50" width="200" height="100" fill="red"/>
  <circle cx="150" cy="200" r="40" fill="green"/>
  <rect x="20" y="20" width="50" height="50" fill="blue" class="small-box"/>
</svg>"#;
