//! Labeling filters compose as conjunctions, and kind metadata behaves as
//! configured.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use uuid::Uuid;

use thesaurus_core::{
    ConceptRepository, CreateLabelingRequest, InMemoryVocabulary, LabelRepository, LabelingKind,
    LabelingQuery, LabelingRegistry, LabelingRepository, NewLabel, ALT_LABEL_KIND,
    PREF_LABEL_KIND,
};

/// Counts WARN events.
struct WarnCounter(Arc<AtomicUsize>);

impl<S: Subscriber> Layer<S> for WarnCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

fn count_warnings<T>(f: impl FnOnce() -> T) -> (T, usize) {
    let counter = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(WarnCounter(counter.clone()));
    let out = tracing::subscriber::with_default(subscriber, f);
    (out, counter.load(Ordering::SeqCst))
}

#[test]
fn test_relation_name_inferred_with_one_warning_per_call() {
    let kind = LabelingKind::new("Labeling::Broader", "skos", "broader");

    let (name, warnings) = count_warnings(|| kind.relation_name());
    assert_eq!(name, "broader");
    assert_eq!(warnings, 1);

    let (names, warnings) = count_warnings(|| (kind.relation_name(), kind.relation_name()));
    assert_eq!(names, ("broader".to_string(), "broader".to_string()));
    assert_eq!(warnings, 2);
}

#[test]
fn test_explicit_relation_name_does_not_warn() {
    let kind = LabelingKind::new("Labeling::Broader", "skos", "broader")
        .with_relation_name("broader_labelings");
    let (name, warnings) = count_warnings(|| kind.relation_name());
    assert_eq!(name, "broader_labelings");
    assert_eq!(warnings, 0);
}

#[test]
fn test_singular_defaults_to_false_unless_configured() {
    let registry = LabelingRegistry::builtin();
    assert!(registry.require(PREF_LABEL_KIND).unwrap().is_singular());
    assert!(!registry.require(ALT_LABEL_KIND).unwrap().is_singular());
    assert!(!LabelingKind::new("Labeling::Any", "ex", "any").is_singular());
}

struct Fixture {
    store: InMemoryVocabulary,
    concepts: Vec<Uuid>,
    labels: Vec<Uuid>,
}

/// Two published and two draft concepts, each with labels in several
/// languages, some published.
async fn fixture() -> Fixture {
    let store = InMemoryVocabulary::new();
    let mut concepts = Vec::new();
    let mut labels = Vec::new();

    let data: [(&str, bool, &[(&str, &str, Option<&str>, bool)]); 4] = [
        (
            "c1",
            true,
            &[
                (PREF_LABEL_KIND, "Lorem Ypsem", Some("de"), true),
                (ALT_LABEL_KIND, "lorem", Some("en"), false),
            ],
        ),
        (
            "c2",
            false,
            &[
                (PREF_LABEL_KIND, "Dolor", Some("de"), true),
                (ALT_LABEL_KIND, "Lorax", None, true),
            ],
        ),
        (
            "c3",
            true,
            &[
                (PREF_LABEL_KIND, "Sit", Some("en"), false),
                (ALT_LABEL_KIND, "Loremipsum", Some("de"), false),
            ],
        ),
        ("c4", false, &[(PREF_LABEL_KIND, "Amet", Some("en"), true)]),
    ];

    for (origin, published, rows) in data {
        let (concept, _) = store.find_or_create_concept(origin).await.unwrap();
        if published {
            store.publish_concept(concept.id).await.unwrap();
        }
        concepts.push(concept.id);
        for (kind, value, lang, label_published) in rows {
            let row = store
                .create_labeling(CreateLabelingRequest {
                    owner_id: concept.id,
                    kind: kind.to_string(),
                    label: NewLabel::new(*value, *lang),
                })
                .await
                .unwrap();
            if *label_published {
                store.publish_label(row.label.id).await.unwrap();
            }
            labels.push(row.label.id);
        }
    }

    Fixture {
        store,
        concepts,
        labels,
    }
}

fn single_filters(f: &Fixture) -> Vec<LabelingQuery> {
    vec![
        LabelingQuery::new().by_concept(f.concepts[0]),
        LabelingQuery::new().by_concept(f.concepts[1]),
        LabelingQuery::new().by_label(f.labels[1]),
        LabelingQuery::new().concept_published(),
        LabelingQuery::new().label_published(),
        LabelingQuery::new().label_begins_with("lor"),
        LabelingQuery::new().label_begins_with("LOREM"),
        LabelingQuery::new().by_label_language("de"),
        LabelingQuery::new().by_label_language("en"),
        LabelingQuery::new().by_kind(ALT_LABEL_KIND),
    ]
}

async fn ids(store: &InMemoryVocabulary, query: &LabelingQuery) -> BTreeSet<Uuid> {
    store
        .list_labelings(query)
        .await
        .unwrap()
        .into_iter()
        .map(|row| row.labeling.id)
        .collect()
}

#[tokio::test]
async fn test_filters_applied_in_sequence_equal_their_conjunction() {
    let f = fixture().await;
    let queries = single_filters(&f);

    for a in &queries {
        for b in &queries {
            let chained = ids(&f.store, &a.clone().merge(b.clone())).await;
            let left = ids(&f.store, a).await;
            let right = ids(&f.store, b).await;
            let conjunction: BTreeSet<Uuid> = left.intersection(&right).copied().collect();
            assert_eq!(chained, conjunction, "a = {:?}, b = {:?}", a, b);
        }
    }
}

#[tokio::test]
async fn test_scoped_filters_select_expected_rows() {
    let f = fixture().await;

    let published_de = f
        .store
        .list_labelings(
            &LabelingQuery::new()
                .concept_published()
                .label_published()
                .by_label_language("de"),
        )
        .await
        .unwrap();
    assert_eq!(published_de.len(), 1);
    assert_eq!(published_de[0].label.value, "Lorem Ypsem");

    let lor = f
        .store
        .list_labelings(&LabelingQuery::new().label_begins_with("Lor"))
        .await
        .unwrap();
    let values: Vec<&str> = lor.iter().map(|r| r.label.value.as_str()).collect();
    assert_eq!(values, vec!["Lorem Ypsem", "lorem", "Lorax", "Loremipsum"]);

    let by_label = f
        .store
        .list_labelings(&LabelingQuery::new().by_label(f.labels[2]))
        .await
        .unwrap();
    assert_eq!(by_label.len(), 1);
    assert_eq!(by_label[0].labeling.owner_id, f.concepts[1]);
}
