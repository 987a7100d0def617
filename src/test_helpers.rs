//! Shared test utilities for the resume-forge test suite.
//!
//! Provides a canonical in-memory résumé fixture plus builders for the
//! smaller pieces, so unit tests across modules agree on one sample document
//! instead of each assembling its own.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let resume = sample_resume();
//! assert!(resume.validate().is_empty());
//!
//! let built = builder.build(&resume).unwrap();
//! ```

use chrono::TimeZone;
use chrono::Utc;

use crate::model::{
    Achievement, Education, Experience, Language, Location, Metric, PersonalInfo, Proficiency,
    ProfessionalSummary, ResumeData, Skill, SkillCategory,
};

// =========================================================================
// Fixture résumé
// =========================================================================

/// The canonical test résumé: one current position at Acme, two skill
/// categories, one education entry, and one optional section (languages)
/// present so builders exercise both the present and absent branches.
pub fn sample_resume() -> ResumeData {
    ResumeData {
        version: "1.0.0".to_string(),
        last_updated: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
        personal_info: PersonalInfo {
            name: "Jane Doe".to_string(),
            title: "Staff Engineer".to_string(),
            email: "jane@example.com".to_string(),
            phone: Some("+1-555-867-5309".to_string()),
            location: Location {
                city: "Portland".to_string(),
                state: "OR".to_string(),
                country: "USA".to_string(),
                remote_friendly: true,
            },
            links: None,
        },
        professional_summary: ProfessionalSummary {
            headline: "Engineer who ships".to_string(),
            overview: "A decade of building reliable systems.".to_string(),
            key_strengths: vec!["Distributed systems".to_string(), "Mentoring".to_string()],
            years_experience: Some(10),
        },
        experience: vec![Experience {
            company: "Acme".to_string(),
            role: "Engineer".to_string(),
            start_date: "2020-01".to_string(),
            end_date: None,
            location: Some("Remote".to_string()),
            company_description: None,
            achievements: vec![Achievement {
                description: "Cut deploy time".to_string(),
                metrics: Some(vec![Metric {
                    value: "40".to_string(),
                    unit: "%".to_string(),
                }]),
                technologies: Some(vec!["Rust".to_string()]),
            }],
        }],
        skills: vec![
            SkillCategory {
                display_name: "Languages".to_string(),
                skills: vec![
                    skill("Rust", Proficiency::Expert),
                    skill("Python", Proficiency::Advanced),
                ],
            },
            SkillCategory {
                display_name: "Infrastructure".to_string(),
                skills: vec![skill("Kubernetes", Proficiency::Intermediate)],
            },
        ],
        education: vec![Education {
            institution: "State University".to_string(),
            degree: "BSc Computer Science".to_string(),
            field_of_study: None,
            graduation_date: "2014".to_string(),
            gpa: Some(3.7),
            honors: None,
        }],
        certifications: None,
        projects: None,
        awards: None,
        publications: None,
        languages: Some(vec![Language {
            language: "English".to_string(),
            proficiency: "native".to_string(),
        }]),
    }
}

/// A skill with the given name and proficiency.
pub fn skill(name: &str, proficiency: Proficiency) -> Skill {
    Skill {
        name: name.to_string(),
        proficiency,
    }
}

// =========================================================================
// Source documents
// =========================================================================

/// The sample résumé serialized as YAML, for source-loading tests.
pub fn sample_resume_yaml() -> String {
    serde_yml::to_string(&sample_resume()).unwrap()
}

/// The sample résumé serialized as JSON, for source-loading tests.
pub fn sample_resume_json() -> String {
    serde_json::to_string_pretty(&sample_resume()).unwrap()
}
