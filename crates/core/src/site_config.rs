//! The single global site-configuration document.
//!
//! One row keyed `config_id = 'global'`, created with defaults on first
//! read and fully replaced on admin writes. Never deleted.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

pub const CONFIG_ID: &str = "global";

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfigRow {
    pub config_id: String,
    pub hero_title: String,
    pub hero_subtitle: String,
    pub about_summary: String,
    pub about_bio_long: String,
    pub author_image_url: String,
    pub admin_profile_image: String,
    pub updated_at: DateTime<Utc>,
}

/// Field values used to seed the row on first read.
#[derive(Debug, Clone)]
pub struct SiteConfigDefaults {
    pub hero_title: &'static str,
    pub hero_subtitle: &'static str,
    pub about_summary: &'static str,
    pub about_bio_long: &'static str,
    pub author_image_url: &'static str,
    pub admin_profile_image: &'static str,
}

pub const DEFAULTS: SiteConfigDefaults = SiteConfigDefaults {
    hero_title: "Welcome to The Verse",
    hero_subtitle: "Dive into worlds crafted with passion and precision — \
        captivating narratives that explore the human condition and inspire \
        the imagination.",
    about_summary: "A storyteller and creative technologist exploring the \
        intersection of technology, design, and storytelling.",
    about_bio_long: "An emerging author working on an original fantasy \
        series, channeling imagination into world-building and storytelling \
        while building the software that publishes it.",
    author_image_url: "/images/admin.jpg",
    admin_profile_image: "/images/user-avatar.png",
};
