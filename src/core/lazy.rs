//! Deferred image loading.
//!
//! An image opts in with a marker attribute holding its real source
//! (`<img data-lazy="photo.jpg">`). Revealing moves that value into `src` and
//! drops the marker, which is what makes a reveal one-shot: a second reveal of
//! the same element finds no marker and does nothing.

/// Attribute access on an image element. DOM handles are shared references,
/// so mutation goes through `&self`.
pub trait LazyImage {
    fn attribute(&self, name: &str) -> Option<String>;
    fn set_attribute(&self, name: &str, value: &str);
    fn remove_attribute(&self, name: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LazyStrategy {
    /// Nothing marked in scope.
    Nothing,
    /// No intersection observer available: load everything now.
    Immediate,
    /// Observe each image and reveal on approach.
    Observe,
}

pub fn strategy(pending: usize, observer_available: bool) -> LazyStrategy {
    if pending == 0 {
        LazyStrategy::Nothing
    } else if observer_available {
        LazyStrategy::Observe
    } else {
        LazyStrategy::Immediate
    }
}

/// Move the marker value into `src`. Returns whether anything was assigned.
pub fn reveal<I: LazyImage + ?Sized>(img: &I, marker: &str) -> bool {
    let Some(src) = img.attribute(marker).filter(|s| !s.is_empty()) else {
        return false;
    };
    img.set_attribute("src", &src);
    img.remove_attribute(marker);
    true
}

pub fn reveal_all<'a, I, It>(images: It, marker: &str) -> usize
where
    I: LazyImage + 'a,
    It: IntoIterator<Item = &'a I>,
{
    images.into_iter().filter(|img| reveal(*img, marker)).count()
}

/// Process one intersection observer callback batch.
///
/// Each intersecting target is revealed and handed to `unobserve`;
/// non-intersecting entries are skipped. Returns the number of images revealed.
pub fn handle_entries<I, It, F>(entries: It, marker: &str, mut unobserve: F) -> usize
where
    I: LazyImage,
    It: IntoIterator<Item = (I, bool)>,
    F: FnMut(&I),
{
    let mut revealed = 0;
    for (img, intersecting) in entries {
        if !intersecting {
            continue;
        }
        if reveal(&img, marker) {
            revealed += 1;
        }
        unobserve(&img);
    }
    revealed
}
