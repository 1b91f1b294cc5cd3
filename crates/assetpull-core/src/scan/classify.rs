//! Which elements and attributes carry asset URLs.

use crate::markup::Element;

/// Kind of element a remote reference was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    /// Single-source raster image (`<img src>`, Markdown `![](...)`).
    PlainImage,
    /// Vector graphic (`<image href>`, `<use href>`, `.svg` sources).
    Vector,
    /// Composite element with alternate sources (`srcset`, `<source>`).
    GalleryElement,
}

/// How an attribute value carries URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrShape {
    /// The whole value is one URL.
    Single,
    /// Comma-separated candidates with descriptors (`srcset`).
    SrcSet,
}

/// Decides which elements are scanned and how their attributes are read.
pub trait TagClassifier {
    /// Kind of `element`, or None if it never references assets.
    fn element_kind(&self, element: &Element<'_>) -> Option<TagKind>;

    /// Shape of the URL(s) in `attr_name` on an element named `element_name`,
    /// or None if the attribute is not an asset source.
    fn url_attribute(&self, element_name: &str, attr_name: &str) -> Option<AttrShape>;
}

/// Classifier for HTML image elements, SVG image/use elements and the
/// `Image`/`Picture` components of component-based site generators.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultClassifier;

fn has_attr(element: &Element<'_>, name: &str) -> bool {
    element
        .attributes
        .iter()
        .any(|a| a.name.eq_ignore_ascii_case(name))
}

/// Kind of an element by tag name; `composite` means it carries a `srcset`.
pub(crate) fn kind_by_name(name: &str, composite: bool) -> Option<TagKind> {
    match name {
        "Picture" => Some(TagKind::GalleryElement),
        "Image" if composite => Some(TagKind::GalleryElement),
        "Image" => Some(TagKind::PlainImage),
        "image" | "use" => Some(TagKind::Vector),
        name if name.eq_ignore_ascii_case("source") => Some(TagKind::GalleryElement),
        name if name.eq_ignore_ascii_case("img") => {
            if composite {
                Some(TagKind::GalleryElement)
            } else {
                Some(TagKind::PlainImage)
            }
        }
        _ => None,
    }
}

impl TagClassifier for DefaultClassifier {
    fn element_kind(&self, element: &Element<'_>) -> Option<TagKind> {
        let composite = has_attr(element, "srcset") || has_attr(element, "data-srcset");
        kind_by_name(element.name, composite)
    }

    fn url_attribute(&self, element_name: &str, attr_name: &str) -> Option<AttrShape> {
        let attr = attr_name.to_ascii_lowercase();
        match attr.as_str() {
            "src" | "data-src" => Some(AttrShape::Single),
            "srcset" | "data-srcset" => Some(AttrShape::SrcSet),
            "href" | "xlink:href" if matches!(element_name, "image" | "use") => {
                Some(AttrShape::Single)
            }
            _ => None,
        }
    }
}

/// Single images whose URL path ends in `.svg` are reported as vectors.
pub(crate) fn refine_kind(kind: TagKind, url: &url::Url) -> TagKind {
    if kind == TagKind::PlainImage && url.path().to_ascii_lowercase().ends_with(".svg") {
        TagKind::Vector
    } else {
        kind
    }
}
