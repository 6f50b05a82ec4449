use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the six fixed document classifications published on the site
///
/// The key drives the listing URL (`{base}/{key}?pagenumber={n}`), the
/// bootstrap file name (`{key}.html`) and, through the display folder, the
/// on-disk layout. Declaration order is the walk order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "bao-cao-thuong-nien")]
    AnnualReport,

    #[serde(rename = "bao-cao-tai-chinh")]
    FinancialStatement,

    #[serde(rename = "dieu-le-cong-ty")]
    CompanyCharter,

    #[serde(rename = "quy-che-quan-tri-cong-ty")]
    GovernanceRegulation,

    #[serde(rename = "cong-bao-thong-tin")]
    InformationDisclosure,

    #[serde(rename = "ban-cao-bach")]
    Prospectus,
}

impl Category {
    /// All categories in walk order
    pub const ALL: [Category; 6] = [
        Category::AnnualReport,
        Category::FinancialStatement,
        Category::CompanyCharter,
        Category::GovernanceRegulation,
        Category::InformationDisclosure,
        Category::Prospectus,
    ];

    /// The URL key of this category
    pub fn key(&self) -> &'static str {
        match self {
            Self::AnnualReport => "bao-cao-thuong-nien",
            Self::FinancialStatement => "bao-cao-tai-chinh",
            Self::CompanyCharter => "dieu-le-cong-ty",
            Self::GovernanceRegulation => "quy-che-quan-tri-cong-ty",
            Self::InformationDisclosure => "cong-bao-thong-tin",
            Self::Prospectus => "ban-cao-bach",
        }
    }

    /// The human-readable folder name used on disk and in summaries
    pub fn display_folder(&self) -> &'static str {
        match self {
            Self::AnnualReport => "Báo cáo thường niên",
            Self::FinancialStatement => "Báo cáo tài chính",
            Self::CompanyCharter => "Điều lệ công ty",
            Self::GovernanceRegulation => "Quy chế quản trị công ty",
            Self::InformationDisclosure => "Công bố thông tin",
            Self::Prospectus => "Bản cáo bạch",
        }
    }

    /// Looks up a category by its URL key
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Maps a category key to its display folder, falling back to the key itself
///
/// ```
/// use netco_harvest::catalog::display_folder_for_key;
///
/// assert_eq!(display_folder_for_key("ban-cao-bach"), "Bản cáo bạch");
/// assert_eq!(display_folder_for_key("tin-tuc"), "tin-tuc");
/// ```
pub fn display_folder_for_key(key: &str) -> &str {
    match Category::from_key(key) {
        Some(category) => category.display_folder(),
        None => key,
    }
}
