//! Comparing recorded commits with the remote branch head.

use std::path::PathBuf;

use crate::git::RepoRef;
use crate::github::RepoHost;
use crate::metadata::SourceType;

use super::InstalledSkill;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Freshness {
    UpToDate,
    Outdated { latest: String },
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutdatedReport {
    pub name: String,
    pub install_path: PathBuf,
    pub freshness: Freshness,
}

pub async fn check_outdated(host: &dyn RepoHost, skills: &[InstalledSkill]) -> Vec<OutdatedReport> {
    let mut reports = Vec::with_capacity(skills.len());
    for skill in skills {
        reports.push(OutdatedReport {
            name: skill.name.clone(),
            install_path: skill.install_path.clone(),
            freshness: freshness(host, skill).await,
        });
    }
    reports
}

async fn freshness(host: &dyn RepoHost, skill: &InstalledSkill) -> Freshness {
    let Some(metadata) = &skill.metadata else {
        return Freshness::Unknown("no metadata".to_string());
    };
    match metadata.source_type {
        SourceType::Git | SourceType::Registry => {}
        SourceType::Local => return Freshness::Unknown("local source".to_string()),
        SourceType::Unknown => return Freshness::Unknown("unknown source type".to_string()),
    }
    let Some(repo_url) = &metadata.repo_url else {
        return Freshness::Unknown("missing repo URL".to_string());
    };
    let Some(installed) = &metadata.commit_hash else {
        return Freshness::Unknown("no recorded commit".to_string());
    };
    let repo_ref = match RepoRef::from_repo_url(repo_url) {
        Ok(repo_ref) => repo_ref,
        Err(e) => return Freshness::Unknown(e.to_string()),
    };

    match host.latest_commit(&repo_ref.owner, &repo_ref.repo, None).await {
        Ok(latest) if latest == *installed => Freshness::UpToDate,
        Ok(latest) => Freshness::Outdated { latest },
        Err(e) => Freshness::Unknown(e.to_string()),
    }
}
