use crate::error::AmiRefreshError;
use std::cmp::Ordering;
use std::fmt;
use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub enum ImageState {
    Available,
    Pending,
    Deprecated,
    Other(String),
}

impl From<&str> for ImageState {
    fn from(state: &str) -> Self {
        match state {
            "available" => ImageState::Available,
            "pending" => ImageState::Pending,
            "deprecated" => ImageState::Deprecated,
            other => ImageState::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImageType {
    Machine,
    Kernel,
    Ramdisk,
    Other(String),
}

impl From<&str> for ImageType {
    fn from(image_type: &str) -> Self {
        match image_type {
            "machine" => ImageType::Machine,
            "kernel" => ImageType::Kernel,
            "ramdisk" => ImageType::Ramdisk,
            other => ImageType::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageDescriptor {
    pub image_id: String,
    pub name: String,
    pub state: ImageState,
    pub image_type: ImageType,
    pub creation_date: Option<String>,
}

impl ImageDescriptor {
    pub fn is_eligible(&self, filter: &NameFilter) -> bool {
        self.state == ImageState::Available
            && self.image_type == ImageType::Machine
            && filter.matches(&self.name)
    }
}

/// Image name pattern in the syntax accepted by the EC2 `name` filter:
/// `*` matches any run of characters and `?` exactly one.
#[derive(Debug, Clone, PartialEq)]
pub struct NameFilter(String);

impl NameFilter {
    pub fn new(pattern: &str) -> Self {
        NameFilter(pattern.to_string())
    }

    pub fn pattern(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, name: &str) -> bool {
        let pattern: Vec<char> = self.0.chars().collect();
        let name: Vec<char> = name.chars().collect();

        let (mut p, mut n) = (0, 0);
        let mut backtrack: Option<(usize, usize)> = None;
        while n < name.len() {
            if p < pattern.len() && (pattern[p] == '?' || pattern[p] == name[n]) {
                p += 1;
                n += 1;
            } else if p < pattern.len() && pattern[p] == '*' {
                backtrack = Some((p, n));
                p += 1;
            } else if let Some((star, matched)) = backtrack {
                p = star + 1;
                n = matched + 1;
                backtrack = Some((star, matched + 1));
            } else {
                return false;
            }
        }
        pattern[p..].iter().all(|c| *c == '*')
    }
}

impl fmt::Display for NameFilter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Picks the eligible image with the greatest name.
///
/// Images sharing the greatest name are ordered by creation date and then by
/// id so the pick does not depend on the order the registry returned them in.
pub fn select_latest<'a>(
    images: &'a [ImageDescriptor],
    filter: &NameFilter,
) -> Result<&'a ImageDescriptor, AmiRefreshError> {
    let mut eligible: Vec<&ImageDescriptor> = images
        .iter()
        .filter(|image| image.is_eligible(filter))
        .collect();
    eligible.sort_by(|a, b| compare_latest(a, b));

    let latest = eligible
        .last()
        .copied()
        .ok_or_else(|| AmiRefreshError::NoEligibleImage {
            filter: filter.pattern().to_string(),
        })?;

    let tied: Vec<&str> = eligible
        .iter()
        .filter(|image| image.name == latest.name)
        .map(|image| image.image_id.as_str())
        .collect();
    if tied.len() > 1 {
        warn!(
            name = %latest.name,
            candidates = ?tied,
            selected = %latest.image_id,
            "multiple images share the latest name"
        );
    }
    Ok(latest)
}

fn compare_latest(a: &ImageDescriptor, b: &ImageDescriptor) -> Ordering {
    a.name
        .cmp(&b.name)
        .then_with(|| a.creation_date.cmp(&b.creation_date))
        .then_with(|| a.image_id.cmp(&b.image_id))
}

#[cfg(test)]
mod tests {
    use crate::error::AmiRefreshError;
    use crate::image::{select_latest, ImageDescriptor, ImageState, ImageType, NameFilter};

    fn image(image_id: &str, name: &str) -> ImageDescriptor {
        ImageDescriptor {
            image_id: image_id.to_string(),
            name: name.to_string(),
            state: ImageState::Available,
            image_type: ImageType::Machine,
            creation_date: None,
        }
    }

    #[test]
    fn test_select_lexicographic_max() {
        let images = vec![
            image("ami-1", "img-2023-01-01"),
            image("ami-2", "img-2023-06-15"),
            image("ami-3", "img-2022-12-31"),
        ];

        let latest = select_latest(&images, &NameFilter::new("img-*")).unwrap();
        assert_eq!(latest.name, "img-2023-06-15");
        assert_eq!(latest.image_id, "ami-2");
    }

    #[test]
    fn test_ineligible_images_are_never_selected() {
        let mut deprecated = image("ami-deprecated", "img-2099-01-01");
        deprecated.state = ImageState::Deprecated;
        let mut pending = image("ami-pending", "img-2098-01-01");
        pending.state = ImageState::Pending;
        let mut kernel = image("ami-kernel", "img-2097-01-01");
        kernel.image_type = ImageType::Kernel;
        let mut ramdisk = image("ami-ramdisk", "img-2096-01-01");
        ramdisk.image_type = ImageType::Ramdisk;

        let images = vec![
            deprecated,
            pending,
            kernel,
            ramdisk,
            image("ami-ok", "img-2023-01-01"),
        ];

        let latest = select_latest(&images, &NameFilter::new("img-*")).unwrap();
        assert_eq!(latest.image_id, "ami-ok");
    }

    #[test]
    fn test_names_outside_the_filter_are_ignored() {
        let images = vec![image("ami-rhel", "RHEL8-2024-01"), image("ami-z", "ZZZ")];

        let latest = select_latest(&images, &NameFilter::new("RHEL8*")).unwrap();
        assert_eq!(latest.image_id, "ami-rhel");
    }

    #[test]
    fn test_empty_set() {
        let filter = NameFilter::new("RHEL8*");

        assert_eq!(
            select_latest(&[], &filter).err().unwrap(),
            AmiRefreshError::NoEligibleImage {
                filter: "RHEL8*".to_string()
            }
        );

        let mut deprecated = image("ami-1", "RHEL8-2024-01");
        deprecated.state = ImageState::Deprecated;
        assert!(matches!(
            select_latest(&[deprecated], &filter),
            Err(AmiRefreshError::NoEligibleImage { .. })
        ));
    }

    #[test]
    fn test_tie_prefers_newest_creation_date() {
        let mut older = image("ami-b", "RHEL8-2024-05");
        older.creation_date = Some("2024-05-01T10:00:00.000Z".to_string());
        let mut newer = image("ami-a", "RHEL8-2024-05");
        newer.creation_date = Some("2024-05-02T10:00:00.000Z".to_string());

        let images = vec![newer.clone(), older.clone()];
        let latest = select_latest(&images, &NameFilter::new("RHEL8*")).unwrap();
        assert_eq!(latest.image_id, "ami-a");

        let images = vec![older, newer];
        let latest = select_latest(&images, &NameFilter::new("RHEL8*")).unwrap();
        assert_eq!(latest.image_id, "ami-a");
    }

    #[test]
    fn test_tie_without_dates_falls_back_to_id() {
        let images = vec![image("ami-222", "RHEL8-2024-05"), image("ami-111", "RHEL8-2024-05")];

        let latest = select_latest(&images, &NameFilter::new("RHEL8*")).unwrap();
        assert_eq!(latest.image_id, "ami-222");
    }

    #[test]
    fn test_name_filter() {
        let filter = NameFilter::new("RHEL-8.?.*_HVM-*");
        assert!(filter.matches("RHEL-8.6.0_HVM-20220503-x86_64-2-Hourly2-GP2"));
        assert!(!filter.matches("RHEL-8.10.0_HVM-20240503-x86_64"));
        assert!(!filter.matches("RHEL-9.0.0_HVM-20220503"));

        assert!(NameFilter::new("*").matches(""));
        assert!(NameFilter::new("exact").matches("exact"));
        assert!(!NameFilter::new("exact").matches("exactly"));
        assert!(NameFilter::new("a*b*c").matches("aXXbYYbc"));
        assert!(!NameFilter::new("a*b*c").matches("aXXbYY"));
    }

    #[test]
    fn test_parse_wire_values() {
        assert_eq!(ImageState::from("available"), ImageState::Available);
        assert_eq!(
            ImageState::from("failed"),
            ImageState::Other("failed".to_string())
        );
        assert_eq!(ImageType::from("machine"), ImageType::Machine);
        assert_eq!(ImageType::from("ramdisk"), ImageType::Ramdisk);
    }
}
