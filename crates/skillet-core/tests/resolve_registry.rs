mod support;

use std::sync::Arc;
use std::sync::atomic::Ordering;

use skillet_core::error::SkillError;
use skillet_core::metadata::SourceType;
use skillet_core::registry::RankingPolicy;
use skillet_core::source::{Chooser, DirectRepoResolver, RegistryResolver};

use support::fakes::{FakeHost, FakeIndex, FakeSearch, ScriptedChooser, hit};
use support::skill_md;

const FALLBACK: &str = "anthropics/skills";

fn host() -> FakeHost {
    FakeHost::new()
        .with_repo("acme/foo", &[("SKILL.md", skill_md("foo").as_str())])
        .with_repo("other/foo", &[("SKILL.md", skill_md("foo").as_str())])
        .with_repo("acme/foobar", &[("SKILL.md", skill_md("foobar").as_str())])
        .with_repo(
            FALLBACK,
            &[
                ("skills/pdf/SKILL.md", skill_md("pdf").as_str()),
                ("skills/xlsx/SKILL.md", skill_md("xlsx").as_str()),
            ],
        )
}

fn resolver(
    host: FakeHost,
    index: FakeIndex,
    search: Arc<FakeSearch>,
    chooser: Arc<ScriptedChooser>,
) -> RegistryResolver {
    let chooser: Arc<dyn Chooser> = chooser;
    let direct = DirectRepoResolver::new(Arc::new(host), chooser.clone());
    RegistryResolver::new(
        Arc::new(index),
        search,
        direct,
        chooser,
        vec![FALLBACK.to_string()],
    )
}

#[tokio::test]
async fn single_exact_match_installs_without_prompt() {
    let index = FakeIndex::with_hits(vec![
        hit("foo", "acme", "foo", None, 3),
        hit("foobar", "acme", "foobar", None, 900),
    ]);
    let chooser = Arc::new(ScriptedChooser::never());

    let resolution = resolver(host(), index, Arc::new(FakeSearch::default()), chooser.clone())
        .resolve("foo")
        .await
        .unwrap();

    assert_eq!(resolution.skill.owner, "acme");
    assert_eq!(resolution.skill.repo, "foo");
    assert_eq!(resolution.metadata.source_type, SourceType::Registry);
    assert_eq!(chooser.prompts(), 0);
}

#[tokio::test]
async fn dominant_popularity_installs_without_prompt() {
    let index = FakeIndex::with_hits(vec![
        hit("foo", "other", "foo", None, 10),
        hit("foo", "acme", "foo", None, 51),
    ]);
    let chooser = Arc::new(ScriptedChooser::never());

    let resolution = resolver(host(), index, Arc::new(FakeSearch::default()), chooser.clone())
        .resolve("foo")
        .await
        .unwrap();

    assert_eq!(resolution.skill.owner, "acme");
    assert_eq!(chooser.prompts(), 0);
}

#[tokio::test]
async fn close_popularity_prompts() {
    let index = FakeIndex::with_hits(vec![
        hit("foo", "other", "foo", None, 10),
        hit("foo", "acme", "foo", None, 50),
    ]);
    let chooser = Arc::new(ScriptedChooser::answering(&[Some(1)]));

    let resolution = resolver(host(), index, Arc::new(FakeSearch::default()), chooser.clone())
        .resolve("foo")
        .await
        .unwrap();

    // Candidates are ordered by popularity; index 1 is the less popular one.
    assert_eq!(resolution.skill.owner, "other");
    let shown = chooser.shown.lock().unwrap();
    assert_eq!(shown[0].len(), 3);
    assert_eq!(shown[0][2], "Search more broadly");
}

#[tokio::test]
async fn search_more_broadly_moves_to_fallback_repositories() {
    let index = FakeIndex::with_hits(vec![hit("pdf-tools", "acme", "foobar", None, 5)]);
    let chooser = Arc::new(ScriptedChooser::answering(&[Some(1)]));

    let resolution = resolver(host(), index, Arc::new(FakeSearch::default()), chooser)
        .resolve("pdf")
        .await
        .unwrap();

    assert_eq!(resolution.skill.repo, "skills");
    assert_eq!(resolution.skill.subpath.as_deref(), Some("skills/pdf"));
}

#[tokio::test]
async fn index_failure_falls_through_to_fallback_repositories() {
    let index = FakeIndex::failing(|| SkillError::RateLimited("index".into()));

    let resolution = resolver(
        host(),
        index,
        Arc::new(FakeSearch::default()),
        Arc::new(ScriptedChooser::never()),
    )
    .resolve("xlsx")
    .await
    .unwrap();

    assert_eq!(resolution.skill.skill_name, "xlsx");
    assert_eq!(resolution.metadata.source_type, SourceType::Registry);
}

#[tokio::test]
async fn rate_limited_fallback_repository_is_skipped() {
    let host = host().failing(FALLBACK, || SkillError::RateLimited("api".into()));
    let search = Arc::new(FakeSearch::with(&["someone/pdf-skill"]));

    let err = resolver(host, FakeIndex::empty(), search.clone(), Arc::new(ScriptedChooser::never()))
        .resolve("pdf")
        .await
        .unwrap_err();

    assert!(matches!(err, SkillError::NotFound { .. }));
    assert_eq!(search.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn broad_search_only_suggests() {
    let search = Arc::new(FakeSearch::with(&["someone/zzz-skill", "else/zzz"]));

    let err = resolver(host(), FakeIndex::empty(), search, Arc::new(ScriptedChooser::never()))
        .resolve("zzz")
        .await
        .unwrap_err();

    match err {
        SkillError::NotFound {
            message,
            suggestions,
        } => {
            assert_eq!(suggestions.len(), 2);
            assert_eq!(suggestions[0].repo, "someone/zzz-skill");
            assert!(message.contains("https://github.com/search?"));
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn cancelling_the_candidate_prompt_stops_resolution() {
    let index = FakeIndex::with_hits(vec![
        hit("foo", "other", "foo", None, 10),
        hit("foo", "acme", "foo", None, 20),
    ]);
    let search = Arc::new(FakeSearch::default());

    let err = resolver(host(), index, search.clone(), Arc::new(ScriptedChooser::answering(&[None])))
        .resolve("foo")
        .await
        .unwrap_err();

    assert!(matches!(err, SkillError::Cancelled));
    assert_eq!(search.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn custom_policy_changes_auto_selection() {
    let index = FakeIndex::with_hits(vec![
        hit("foo", "other", "foo", None, 10),
        hit("foo", "acme", "foo", None, 20),
    ]);
    let policy = RankingPolicy {
        dominance_ratio: 1,
        ..RankingPolicy::default()
    };

    let resolution = resolver(
        host(),
        index,
        Arc::new(FakeSearch::default()),
        Arc::new(ScriptedChooser::never()),
    )
    .with_policy(policy)
    .resolve("foo")
    .await
    .unwrap();

    assert_eq!(resolution.skill.owner, "acme");
}
