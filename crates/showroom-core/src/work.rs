//! Work catalog: items built once from the media file list, shuffled with a
//! pinned featured item, plus the media URL layout.

use rand::seq::SliceRandom;
use rand::Rng;

pub const MEDIA_ROOT: &str = "/media";
pub const OPTIMIZED_ROOT: &str = "/media/optimized";
pub const MAIN_WIDTHS: [u32; 2] = [900, 1800];
pub const THUMB_WIDTH: u32 = 360;

/// Media configuration; loaded once and passed by reference.
#[derive(Clone, Debug, PartialEq)]
pub struct MediaConfig {
    pub files: Vec<String>,
    pub featured: Option<String>,
}

impl Default for MediaConfig {
    fn default() -> Self {
        let files = [
            "automotive-2024-gt-launch.jpg",
            "automotive-2023-night-drive.jpg",
            "editorial-2024-atelier.jpg",
            "editorial-2022-salt-flats.jpg",
            "product-2024-chronograph.jpg",
            "product-2023-headphones.jpg",
            "campaign-2023-coastline.jpg",
            "campaign-2022-winter-run.jpg",
            "motion-2024-studio-loop.jpg",
            "interior-2023-showroom.jpg",
        ];
        Self {
            files: files.iter().map(|f| f.to_string()).collect(),
            featured: Some("automotive-2024-gt-launch.jpg".to_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkItem {
    pub id: String,
    pub title: String,
    pub category: String,
    pub year: Option<u16>,
    pub image: String,
}

impl WorkItem {
    pub fn from_file(file: &str) -> Self {
        let stem = file.rsplit_once('.').map(|(s, _)| s).unwrap_or(file);
        let mut parts = stem.splitn(3, ['-', '_']);
        let (category, year, slug) = match (parts.next(), parts.next(), parts.next()) {
            (Some(c), Some(y), Some(rest)) if y.len() == 4 && y.parse::<u16>().is_ok() => {
                (title_case(c), y.parse().ok(), rest)
            }
            _ => ("Selected work".to_string(), None, stem),
        };
        Self {
            id: stem.to_ascii_lowercase(),
            title: title_case(slug),
            category,
            year,
            image: file.to_string(),
        }
    }

    pub fn main_url(&self, width: u32) -> String {
        format!("{OPTIMIZED_ROOT}/main-{width}/{}", self.image)
    }

    pub fn thumb_url(&self) -> String {
        format!("{OPTIMIZED_ROOT}/thumb-{THUMB_WIDTH}/{}", self.image)
    }

    pub fn original_url(&self) -> String {
        format!("{MEDIA_ROOT}/{}", self.image)
    }

    pub fn main_src_set(&self) -> String {
        MAIN_WIDTHS
            .iter()
            .map(|w| format!("{} {w}w", self.main_url(*w)))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn title_case(s: &str) -> String {
    s.split(['-', '_', ' '])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Session work list; immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct WorkCatalog {
    items: Vec<WorkItem>,
}

impl WorkCatalog {
    /// Featured file first, all other files in Fisher–Yates order.
    pub fn shuffled<R: Rng + ?Sized>(config: &MediaConfig, rng: &mut R) -> Self {
        let featured = config
            .featured
            .as_deref()
            .filter(|f| config.files.iter().any(|x| x == f));
        let mut rest: Vec<&String> = config
            .files
            .iter()
            .filter(|f| Some(f.as_str()) != featured)
            .collect();
        rest.shuffle(rng);
        let items = featured
            .into_iter()
            .map(WorkItem::from_file)
            .chain(rest.into_iter().map(|f| WorkItem::from_file(f)))
            .collect();
        Self { items }
    }

    pub fn items(&self) -> &[WorkItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_become_titles() {
        let item = WorkItem::from_file("automotive-2024-gt-launch.jpg");
        assert_eq!(item.category, "Automotive");
        assert_eq!(item.year, Some(2024));
        assert_eq!(item.title, "Gt Launch");
        let plain = WorkItem::from_file("studio_portrait.png");
        assert_eq!(plain.category, "Selected work");
        assert_eq!(plain.year, None);
        assert_eq!(plain.title, "Studio Portrait");
    }

    #[test]
    fn media_urls_follow_layout() {
        let item = WorkItem::from_file("a.jpg");
        assert_eq!(item.thumb_url(), "/media/optimized/thumb-360/a.jpg");
        assert_eq!(item.original_url(), "/media/a.jpg");
        assert_eq!(
            item.main_src_set(),
            "/media/optimized/main-900/a.jpg 900w, /media/optimized/main-1800/a.jpg 1800w"
        );
    }
}
