//! Target publication type taxonomy

use serde::{Deserialize, Serialize};
use std::fmt;

/// Publication type in the target research-information system.
///
/// Serialized with the canonical (variant) name, which is also the string a
/// type-mapping table refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PublicationType {
    AcademicArticle,
    AcademicLiteratureReview,
    JournalArticle,
    PopularScienceArticle,
    JournalLeader,
    JournalLetter,
    JournalReview,
    JournalCorrigendum,
    AcademicMonograph,
    NonFictionMonograph,
    Textbook,
    BookAnthology,
    AcademicChapter,
    NonFictionChapter,
    ReportResearch,
    ReportWorkingPaper,
    ReportBasic,
    DegreeBachelor,
    DegreeMaster,
    DegreePhd,
    OtherStudentWork,
    ConferenceLecture,
    ConferencePoster,
    ConferenceReport,
    Lecture,
    OtherPresentation,
    DataSet,
    MusicPerformance,
    Architecture,
    ArtisticDesign,
    Map,
    MovingPicture,
    MediaFeatureArticle,
    MediaReaderOpinion,
    MediaInterview,
}

impl PublicationType {
    /// Every known target type
    pub fn all() -> &'static [PublicationType] {
        use PublicationType::*;
        &[
            AcademicArticle,
            AcademicLiteratureReview,
            JournalArticle,
            PopularScienceArticle,
            JournalLeader,
            JournalLetter,
            JournalReview,
            JournalCorrigendum,
            AcademicMonograph,
            NonFictionMonograph,
            Textbook,
            BookAnthology,
            AcademicChapter,
            NonFictionChapter,
            ReportResearch,
            ReportWorkingPaper,
            ReportBasic,
            DegreeBachelor,
            DegreeMaster,
            DegreePhd,
            OtherStudentWork,
            ConferenceLecture,
            ConferencePoster,
            ConferenceReport,
            Lecture,
            OtherPresentation,
            DataSet,
            MusicPerformance,
            Architecture,
            ArtisticDesign,
            Map,
            MovingPicture,
            MediaFeatureArticle,
            MediaReaderOpinion,
            MediaInterview,
        ]
    }

    /// Canonical name
    pub fn as_str(&self) -> &'static str {
        use PublicationType::*;
        match self {
            AcademicArticle => "AcademicArticle",
            AcademicLiteratureReview => "AcademicLiteratureReview",
            JournalArticle => "JournalArticle",
            PopularScienceArticle => "PopularScienceArticle",
            JournalLeader => "JournalLeader",
            JournalLetter => "JournalLetter",
            JournalReview => "JournalReview",
            JournalCorrigendum => "JournalCorrigendum",
            AcademicMonograph => "AcademicMonograph",
            NonFictionMonograph => "NonFictionMonograph",
            Textbook => "Textbook",
            BookAnthology => "BookAnthology",
            AcademicChapter => "AcademicChapter",
            NonFictionChapter => "NonFictionChapter",
            ReportResearch => "ReportResearch",
            ReportWorkingPaper => "ReportWorkingPaper",
            ReportBasic => "ReportBasic",
            DegreeBachelor => "DegreeBachelor",
            DegreeMaster => "DegreeMaster",
            DegreePhd => "DegreePhd",
            OtherStudentWork => "OtherStudentWork",
            ConferenceLecture => "ConferenceLecture",
            ConferencePoster => "ConferencePoster",
            ConferenceReport => "ConferenceReport",
            Lecture => "Lecture",
            OtherPresentation => "OtherPresentation",
            DataSet => "DataSet",
            MusicPerformance => "MusicPerformance",
            Architecture => "Architecture",
            ArtisticDesign => "ArtisticDesign",
            Map => "Map",
            MovingPicture => "MovingPicture",
            MediaFeatureArticle => "MediaFeatureArticle",
            MediaReaderOpinion => "MediaReaderOpinion",
            MediaInterview => "MediaInterview",
        }
    }

    /// Parse a canonical name. Exact, case-sensitive match.
    pub fn from_canonical(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|t| t.as_str() == name)
    }
}

impl fmt::Display for PublicationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_names_round_trip() {
        for publication_type in PublicationType::all() {
            assert_eq!(
                PublicationType::from_canonical(publication_type.as_str()),
                Some(*publication_type)
            );
        }
    }

    #[test]
    fn test_from_canonical_is_case_sensitive() {
        assert_eq!(PublicationType::from_canonical("academicarticle"), None);
        assert_eq!(PublicationType::from_canonical("Journal article"), None);
    }

    #[test]
    fn test_serializes_as_canonical_name() {
        let json = serde_json::to_string(&PublicationType::AcademicChapter).unwrap();
        assert_eq!(json, "\"AcademicChapter\"");
    }
}
