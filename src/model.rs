//! The résumé data model.
//!
//! A single [`ResumeData`] aggregate is deserialized from the source document
//! (see [`crate::source`]), validated once, and then passed by shared reference
//! to every builder. Nothing mutates it after load — the optional AI
//! enhancement pass produces a new value before the build stage starts.
//!
//! ## Validation
//!
//! Deserialization rejects unknown fields to catch typos early; everything
//! serde cannot express (date shapes, non-empty lists, value ranges) is
//! checked by [`ResumeData::validate`], which collects *all* problems instead
//! of stopping at the first so a user can fix their source file in one pass.
//!
//! ## Optional sections
//!
//! Only personal info, the summary, experience, and education are required.
//! Every other section (certifications, projects, awards, publications,
//! languages) may be absent or empty, and every builder must tolerate that.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// Skill proficiency levels, ordered weakest to strongest.
///
/// Serialized as lowercase strings (`"expert"`, …) — the same tokens the
/// presentation helpers in [`crate::format`] map to CSS classes and badge
/// colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Proficiency {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl Proficiency {
    /// Lowercase token used in templates and badges.
    pub fn as_str(self) -> &'static str {
        match self {
            Proficiency::Beginner => "beginner",
            Proficiency::Intermediate => "intermediate",
            Proficiency::Advanced => "advanced",
            Proficiency::Expert => "expert",
        }
    }
}

/// Geographic location for the contact block.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Location {
    pub city: String,
    pub state: String,
    pub country: String,
    /// Open to remote work — rendered as a "Remote Friendly" tag.
    #[serde(default = "default_true")]
    pub remote_friendly: bool,
}

fn default_true() -> bool {
    true
}

/// Professional and social links. All optional; builders render only what
/// is present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Links {
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub website: Option<String>,
    pub blog: Option<String>,
    pub twitter: Option<String>,
}

/// Name and contact information.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PersonalInfo {
    pub name: String,
    /// Current or target job title.
    pub title: String,
    pub email: String,
    /// Phone in international format; formatted for display by
    /// [`crate::format::format_phone`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub location: Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

/// Headline, overview, and key strengths.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfessionalSummary {
    /// One-line summary rendered under the name.
    pub headline: String,
    /// Multi-paragraph overview. Markdown is allowed; the HTML builder
    /// renders it, other formats use it verbatim.
    pub overview: String,
    #[serde(default)]
    pub key_strengths: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years_experience: Option<u32>,
}

/// A quantified result attached to an achievement (`"40" "%"`,
/// `"3.2" "M requests/day"`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Metric {
    pub value: String,
    pub unit: String,
}

/// One bullet under an experience entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Achievement {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Vec<Metric>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technologies: Option<Vec<String>>,
}

/// A position held. `end_date: None` means the position is current and is
/// rendered as "Present" in every format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Experience {
    pub company: String,
    pub role: String,
    /// `YYYY-MM`.
    pub start_date: String,
    /// `YYYY-MM`, absent for the current position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_description: Option<String>,
    pub achievements: Vec<Achievement>,
}

impl Experience {
    /// Whether this is the current position.
    pub fn is_current(&self) -> bool {
        self.end_date.is_none()
    }

    /// Duration in months; open-ended entries are measured to `now`.
    /// Returns `None` when either date fails to parse.
    pub fn duration_months(&self, now: DateTime<Utc>) -> Option<i32> {
        let (sy, sm) = parse_year_month(&self.start_date)?;
        let (ey, em) = match &self.end_date {
            Some(end) => parse_year_month(end)?,
            None => (now.year(), now.month()),
        };
        Some((ey - sy) * 12 + (em as i32 - sm as i32))
    }
}

/// A single skill with its proficiency level.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Skill {
    pub name: String,
    pub proficiency: Proficiency,
}

/// A named group of related skills, rendered in source order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SkillCategory {
    pub display_name: String,
    pub skills: Vec<Skill>,
}

/// An education entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Education {
    pub institution: String,
    pub degree: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_of_study: Option<String>,
    /// `YYYY`.
    pub graduation_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpa: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub honors: Option<Vec<String>>,
}

/// A professional certification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Certification {
    pub name: String,
    pub issuer: String,
    /// `YYYY-MM`.
    pub date_earned: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_id: Option<String>,
}

/// A personal or professional project.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Project {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlights: Option<Vec<String>>,
}

/// An award or recognition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Award {
    pub title: String,
    pub issuer: String,
    /// `YYYY-MM`.
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A published article or paper.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Publication {
    pub title: String,
    pub publication: String,
    /// `YYYY-MM`.
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co_authors: Option<Vec<String>>,
}

/// A spoken language.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Language {
    pub language: String,
    /// native | fluent | conversational | basic
    pub proficiency: String,
}

/// The root aggregate. Everything a builder needs is reachable from here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResumeData {
    /// Semantic version of the document itself (`"1.2.0"`).
    pub version: String,
    pub last_updated: DateTime<Utc>,
    pub personal_info: PersonalInfo,
    pub professional_summary: ProfessionalSummary,
    pub experience: Vec<Experience>,
    pub skills: Vec<SkillCategory>,
    pub education: Vec<Education>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certifications: Option<Vec<Certification>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<Project>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub awards: Option<Vec<Award>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publications: Option<Vec<Publication>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<Language>>,
}

impl ResumeData {
    /// Validate everything serde cannot express. Returns all problems found,
    /// with a field path prefix, so the user can fix the source in one pass.
    /// An empty vector means the document is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !is_semver(&self.version) {
            errors.push(format!(
                "version: expected MAJOR.MINOR.PATCH, got {:?}",
                self.version
            ));
        }

        require(&mut errors, "personal_info.name", &self.personal_info.name);
        require(&mut errors, "personal_info.title", &self.personal_info.title);
        if !self.personal_info.email.contains('@') {
            errors.push(format!(
                "personal_info.email: not an email address: {:?}",
                self.personal_info.email
            ));
        }
        require(
            &mut errors,
            "personal_info.location.city",
            &self.personal_info.location.city,
        );

        require(
            &mut errors,
            "professional_summary.headline",
            &self.professional_summary.headline,
        );
        require(
            &mut errors,
            "professional_summary.overview",
            &self.professional_summary.overview,
        );

        if self.experience.is_empty() {
            errors.push("experience: at least one entry is required".to_string());
        }
        for (i, exp) in self.experience.iter().enumerate() {
            require(&mut errors, &format!("experience[{i}].company"), &exp.company);
            require(&mut errors, &format!("experience[{i}].role"), &exp.role);
            check_year_month(&mut errors, &format!("experience[{i}].start_date"), &exp.start_date);
            if let Some(end) = &exp.end_date {
                check_year_month(&mut errors, &format!("experience[{i}].end_date"), end);
            }
            if exp.achievements.is_empty() {
                errors.push(format!(
                    "experience[{i}].achievements: at least one entry is required"
                ));
            }
        }

        for (i, cat) in self.skills.iter().enumerate() {
            require(&mut errors, &format!("skills[{i}].display_name"), &cat.display_name);
            if cat.skills.is_empty() {
                errors.push(format!("skills[{i}].skills: category is empty"));
            }
        }

        if self.education.is_empty() {
            errors.push("education: at least one entry is required".to_string());
        }
        for (i, edu) in self.education.iter().enumerate() {
            require(&mut errors, &format!("education[{i}].institution"), &edu.institution);
            check_year(&mut errors, &format!("education[{i}].graduation_date"), &edu.graduation_date);
            if let Some(gpa) = edu.gpa
                && !(0.0..=4.0).contains(&gpa)
            {
                errors.push(format!("education[{i}].gpa: must be within 0.0-4.0, got {gpa}"));
            }
        }

        if let Some(certs) = &self.certifications {
            for (i, cert) in certs.iter().enumerate() {
                check_year_month(&mut errors, &format!("certifications[{i}].date_earned"), &cert.date_earned);
                if let Some(exp) = &cert.expiration_date {
                    check_year_month(&mut errors, &format!("certifications[{i}].expiration_date"), exp);
                }
            }
        }

        errors
    }

    /// The current position, if any entry has no end date.
    pub fn current_role(&self) -> Option<&Experience> {
        self.experience.iter().find(|e| e.is_current())
    }

    /// Total years of professional experience: the explicit summary value
    /// when given, otherwise summed from the experience entries (minimum 1).
    pub fn total_experience_years(&self, now: DateTime<Utc>) -> u32 {
        if let Some(years) = self.professional_summary.years_experience {
            return years;
        }
        let months: i32 = self
            .experience
            .iter()
            .filter_map(|e| e.duration_months(now))
            .filter(|m| *m > 0)
            .sum();
        (months / 12).max(1) as u32
    }

    /// Total skill count across all categories.
    pub fn total_skills(&self) -> usize {
        self.skills.iter().map(|c| c.skills.len()).sum()
    }
}

fn require(errors: &mut Vec<String>, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(format!("{field}: must not be empty"));
    }
}

fn check_year_month(errors: &mut Vec<String>, field: &str, value: &str) {
    if parse_year_month(value).is_none() {
        errors.push(format!("{field}: expected YYYY-MM, got {value:?}"));
    }
}

fn check_year(errors: &mut Vec<String>, field: &str, value: &str) {
    if value.len() != 4 || value.parse::<u32>().is_err() {
        errors.push(format!("{field}: expected YYYY, got {value:?}"));
    }
}

/// Parse a `YYYY-MM` date into (year, month). `None` for any other shape.
pub fn parse_year_month(value: &str) -> Option<(i32, u32)> {
    let (year, month) = value.split_once('-')?;
    if year.len() != 4 || month.len() != 2 {
        return None;
    }
    let year = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    (1..=12).contains(&month).then_some((year, month))
}

fn is_semver(value: &str) -> bool {
    let parts: Vec<&str> = value.split('.').collect();
    parts.len() == 3 && parts.iter().all(|p| !p.is_empty() && p.parse::<u32>().is_ok())
}
