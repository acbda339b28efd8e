//! Batch loaders against PostgreSQL
//!
//! Every test works inside one unit of work and rolls it back, so nothing
//! is left behind in the database.

mod common;

use assert_matches::assert_matches;
use uuid::Uuid;

use cinedex_api::loaders::{BatchLoader, MoviesByDirector, MoviesByGenre};
use cinedex_api::models::{Caller, CreateMovie, Scope};
use cinedex_api::repositories::{DirectorRepository, UnitOfWork};
use cinedex_api::services::MovieService;

use common::unique;

fn admin() -> Caller {
    Caller::new("loader-test", vec![Scope::Admin])
}

#[tokio::test]
async fn test_director_keys_distributed_in_input_order() {
    require_db!(pool);
    let uow = UnitOfWork::begin(&pool).await.unwrap();

    let (kubrick, lynch) = {
        let mut conn = uow.connection().await.unwrap();
        let mut repo = DirectorRepository::new(&mut *conn);
        let kubrick = repo.insert(&unique("Kubrick")).await.unwrap();
        let lynch = repo.insert(&unique("Lynch")).await.unwrap();
        (kubrick.id, lynch.id)
    };
    {
        let mut conn = uow.connection().await.unwrap();
        let mut movies = MovieService::new(&mut *conn);
        for (title, director) in [("Paths of Glory", kubrick), ("Eraserhead", lynch)] {
            movies
                .create(
                    Some(&admin()),
                    CreateMovie {
                        title: title.to_string(),
                        director_id: Some(director),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
        }
    }

    let loader = BatchLoader::new(MoviesByDirector::new(uow.clone()));
    let absent = Uuid::new_v4();
    let results = loader
        .load_many(vec![lynch, absent, kubrick, lynch])
        .await
        .unwrap();

    let titles: Vec<Vec<&str>> = results
        .iter()
        .map(|movies| movies.iter().map(|m| m.title.as_str()).collect())
        .collect();
    assert_eq!(
        titles,
        vec![
            vec!["Eraserhead"],
            vec![],
            vec!["Paths of Glory"],
            vec!["Eraserhead"],
        ]
    );

    uow.rollback().await.unwrap();
}

#[tokio::test]
async fn test_genre_loader_returns_flat_movies() {
    require_db!(pool);
    let uow = UnitOfWork::begin(&pool).await.unwrap();
    let genre = unique("Giallo");

    let movie = {
        let mut conn = uow.connection().await.unwrap();
        MovieService::new(&mut *conn)
            .create(
                Some(&admin()),
                CreateMovie {
                    title: "Suspiria".to_string(),
                    release_year: Some(1977),
                    genre: Some(genre.clone()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
    };
    assert_eq!(movie.genre, genre);

    let genre_id: Uuid = {
        let mut conn = uow.connection().await.unwrap();
        sqlx::query_scalar("SELECT id FROM genres WHERE name = $1")
            .bind(&genre)
            .fetch_one(&mut *conn)
            .await
            .unwrap()
    };

    let loader = BatchLoader::new(MoviesByGenre::new(uow.clone()));
    let movies = loader.load(genre_id).await.unwrap();

    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].id, movie.id);
    assert_eq!(movies[0].release_year, Some(1977));

    uow.rollback().await.unwrap();
}

#[tokio::test]
async fn test_closed_unit_of_work_fails_every_waiter() {
    require_db!(pool);
    let uow = UnitOfWork::begin(&pool).await.unwrap();
    uow.rollback().await.unwrap();
    assert!(!uow.is_open().await);

    let loader = BatchLoader::new(MoviesByDirector::new(uow));
    let (a, b) = tokio::join!(loader.load(Uuid::new_v4()), loader.load(Uuid::new_v4()));

    assert_matches!(a, Err(_));
    assert_matches!(b, Err(_));
}
