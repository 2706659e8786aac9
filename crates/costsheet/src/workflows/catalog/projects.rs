use serde::Serialize;

use super::record::{keys, CatalogRecord};

const DETAIL_FIELDS: [&str; 9] = [
    "RERA",
    "Status",
    "Class",
    "Category",
    "Structure",
    "Typology",
    "Possession",
    "USP",
    "Location",
];

const GALLERY_SIZE: usize = 4;

/// Listing card for one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectCard {
    pub name: String,
    pub location: String,
    pub class: String,
    pub status: String,
    pub image_url: Option<String>,
}

impl ProjectCard {
    /// Badge over the thumbnail.
    pub fn tag(&self) -> &str {
        non_empty(&self.class).unwrap_or("Project")
    }

    /// Chip in the card footer.
    pub fn chip(&self) -> &str {
        non_empty(&self.status)
            .or_else(|| non_empty(&self.class))
            .unwrap_or("Project")
    }
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}

/// Cards ordered by project name, ignoring case.
pub fn sorted_projects(records: &[CatalogRecord]) -> Vec<ProjectCard> {
    let mut ordered: Vec<&CatalogRecord> = records.iter().collect();
    ordered.sort_by_cached_key(|record| record.get(&["Project Name"]).to_lowercase());

    ordered
        .into_iter()
        .enumerate()
        .map(|(index, record)| ProjectCard {
            name: record.get_or(&["Project Name"], &format!("Project {}", index + 1)),
            location: record.get(keys::LOCATION),
            class: record.get(keys::CLASS),
            status: record.get(&["Status"]),
            image_url: non_empty(&record.get(keys::COVER_IMAGE)).map(str::to_string),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectAttribute {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectDetail {
    pub name: String,
    pub attributes: Vec<ProjectAttribute>,
    pub brochure_url: Option<String>,
    pub gallery: Vec<String>,
}

impl ProjectDetail {
    pub fn from_record(record: &CatalogRecord) -> Self {
        let attributes = DETAIL_FIELDS
            .iter()
            .filter_map(|label| {
                let value = record.get(&[label]);
                non_empty(&value).map(|value| ProjectAttribute {
                    label,
                    value: value.to_string(),
                })
            })
            .collect();

        let gallery = (1..=GALLERY_SIZE)
            .map(|index| record.get(&[format!("Image {index} URL").as_str()]))
            .filter(|url| !url.is_empty())
            .collect();

        Self {
            name: record.get(&["Project Name"]),
            attributes,
            brochure_url: non_empty(&record.get(keys::BROCHURE)).map(str::to_string),
            gallery,
        }
    }
}

/// Project whose name matches exactly, falling back to the first listed.
pub fn find_project(records: &[CatalogRecord], name: &str) -> Option<ProjectDetail> {
    records
        .iter()
        .find(|record| record.get(&["Project Name"]) == name)
        .or_else(|| records.first())
        .map(ProjectDetail::from_record)
}
