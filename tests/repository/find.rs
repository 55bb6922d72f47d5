use repobase::{Filter, FindOptions, InMemoryDocumentStore, Projection, RepositoriesExt, SortOrder};

use crate::entities::{Item, PlayerOnly, Score};

async fn scores() -> repobase::Repository<Score, InMemoryDocumentStore> {
    let repo = InMemoryDocumentStore::new().repository::<Score>();
    for (id, player, score) in [("1", "ann", 5), ("2", "bob", 9), ("3", "cat", 1)] {
        repo.save(&mut Score::new(id, player, score)).await.unwrap();
    }
    repo
}

#[tokio::test]
async fn find_by_id_missing_is_none() {
    let repo = InMemoryDocumentStore::new().repository::<Item>();
    assert_eq!(repo.find_by_id("missing").await.unwrap(), None);
}

#[tokio::test]
async fn find_with_no_matches_is_empty() {
    let repo = scores().await;
    let found = repo.find(Filter::field("score").gt(100)).await.unwrap();
    assert!(found.is_empty());
}

#[tokio::test]
async fn find_by_filter() {
    let repo = scores().await;
    let mut found = repo.find(Filter::field("score").gte(5)).await.unwrap();
    found.sort_by(|a, b| a.id.cmp(&b.id));
    assert_eq!(
        found,
        vec![Score::new("1", "ann", 5), Score::new("2", "bob", 9)]
    );
}

#[tokio::test]
async fn sort_desc_skip_one_take_one() {
    let repo = scores().await;
    let options = FindOptions::new()
        .sort_by("score", SortOrder::Descending)
        .skip(1)
        .take(1);

    let found = repo.find_with(Filter::all(), &options).await.unwrap();
    assert_eq!(found, vec![Score::new("1", "ann", 5)]);
}

#[tokio::test]
async fn take_bounds_result_size() {
    let repo = scores().await;
    for take in 1..=4 {
        let found = repo
            .find_with(Filter::all(), &FindOptions::new().take(take))
            .await
            .unwrap();
        assert!(found.len() <= take);
    }
}

#[tokio::test]
async fn windows_match_slices_of_sorted_results() {
    let repo = scores().await;
    let sorted = FindOptions::new().sort_by("score", SortOrder::Ascending);
    let all = repo.find_with(Filter::all(), &sorted).await.unwrap();
    assert_eq!(
        all.iter().map(|s| s.score).collect::<Vec<_>>(),
        vec![1, 5, 9]
    );

    for skip in 0..4 {
        for take in 1..4 {
            let window = repo
                .find_with(Filter::all(), &sorted.clone().skip(skip).take(take))
                .await
                .unwrap();
            let end = (skip + take).min(all.len());
            let start = skip.min(all.len());
            assert_eq!(window, all[start..end].to_vec(), "skip={skip} take={take}");
        }
    }
}

#[tokio::test]
async fn sort_field_without_direction_is_ignored() {
    let repo = scores().await;
    let natural = repo.find(Filter::all()).await.unwrap();
    let unsorted = repo
        .find_with(
            Filter::all(),
            &FindOptions::new().sort_by("score", SortOrder::None),
        )
        .await
        .unwrap();
    assert_eq!(natural, unsorted);
}

#[tokio::test]
async fn field_projection_by_id() {
    let repo = scores().await;
    let projection = Projection::<Score, PlayerOnly>::fields(["player"]);

    let found = repo.find_by_id_projected("2", &projection).await.unwrap();
    assert_eq!(
        found,
        Some(PlayerOnly {
            player: "bob".into()
        })
    );
    assert_eq!(
        repo.find_by_id_projected("nope", &projection).await.unwrap(),
        None
    );
}

#[tokio::test]
async fn projection_equals_transform_of_full_entity() {
    let repo = scores().await;
    let doubled = Projection::<Score, i64>::map(|s| s.score * 2);

    for id in ["1", "2", "3"] {
        let full = repo.find_by_id(id).await.unwrap().unwrap();
        let projected = repo.find_by_id_projected(id, &doubled).await.unwrap();
        assert_eq!(projected, Some(full.score * 2));
    }
}

#[tokio::test]
async fn projected_find_with_sort_and_window() {
    let repo = scores().await;
    let projection = Projection::<Score, PlayerOnly>::fields(["player"]);
    let options = FindOptions::new()
        .sort_by("score", SortOrder::Descending)
        .take(2);

    let found = repo
        .find_projected(Filter::all(), &projection, &options)
        .await
        .unwrap();
    let players: Vec<_> = found.into_iter().map(|p| p.player).collect();
    assert_eq!(players, vec!["bob", "ann"]);
}

#[tokio::test]
async fn sort_by_field_outside_projection() {
    let repo = scores().await;
    let projection = Projection::<Score, PlayerOnly>::fields(["player"]);
    let options = FindOptions::new().sort_by("score", SortOrder::Ascending);

    let found = repo
        .find_projected(Filter::all(), &projection, &options)
        .await
        .unwrap();
    let players: Vec<_> = found.into_iter().map(|p| p.player).collect();
    assert_eq!(players, vec!["cat", "ann", "bob"]);
}
