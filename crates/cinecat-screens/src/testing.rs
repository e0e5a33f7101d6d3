//! Scripted `TmdbApi` for controller tests.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use cinecat_api::tmdb::{
    MovieDetails, MoviePage, MovieSummary, PopularMoviesParams, SearchMovieParams, TmdbApi,
};

/// A request the controller made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    Popular { page: u32, language: String },
    Search { query: String, page: u32 },
    Details { movie_id: u64 },
}

#[derive(Debug)]
struct Reply<T> {
    delay: Duration,
    outcome: Result<T, String>,
}

/// Answers requests from per-endpoint queues, in order.
///
/// Popular and search share one queue. A request that finds its queue empty
/// never completes.
#[derive(Debug, Default)]
pub struct MockApi {
    calls: Mutex<Vec<ApiCall>>,
    pages: Mutex<VecDeque<Reply<MoviePage>>>,
    details: Mutex<VecDeque<Reply<MovieDetails>>>,
}

impl MockApi {
    pub fn push_page(&self, page: MoviePage) {
        self.push_page_after(Duration::ZERO, page);
    }

    pub fn push_page_after(&self, delay: Duration, page: MoviePage) {
        self.pages.lock().unwrap().push_back(Reply {
            delay,
            outcome: Ok(page),
        });
    }

    pub fn push_page_error(&self, message: &str) {
        self.pages.lock().unwrap().push_back(Reply {
            delay: Duration::ZERO,
            outcome: Err(String::from(message)),
        });
    }

    pub fn push_details(&self, details: MovieDetails) {
        self.push_details_after(Duration::ZERO, details);
    }

    pub fn push_details_after(&self, delay: Duration, details: MovieDetails) {
        self.details.lock().unwrap().push_back(Reply {
            delay,
            outcome: Ok(details),
        });
    }

    pub fn push_details_error(&self, message: &str) {
        self.details.lock().unwrap().push_back(Reply {
            delay: Duration::ZERO,
            outcome: Err(String::from(message)),
        });
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().unwrap().push(call);
    }
}

async fn resolve<T>(reply: Option<Reply<T>>) -> Result<T> {
    let Some(reply) = reply else {
        return std::future::pending().await;
    };
    tokio::time::sleep(reply.delay).await;
    reply.outcome.map_err(anyhow::Error::msg)
}

impl TmdbApi for MockApi {
    async fn popular_movies(&self, params: &PopularMoviesParams) -> Result<MoviePage> {
        self.record(ApiCall::Popular {
            page: params.page,
            language: params.language.clone(),
        });
        let reply = self.pages.lock().unwrap().pop_front();
        resolve(reply).await
    }

    async fn search_movies(&self, params: &SearchMovieParams) -> Result<MoviePage> {
        self.record(ApiCall::Search {
            query: params.query.clone(),
            page: params.page,
        });
        let reply = self.pages.lock().unwrap().pop_front();
        resolve(reply).await
    }

    async fn movie_details(&self, movie_id: u64, _language: &str) -> Result<MovieDetails> {
        self.record(ApiCall::Details { movie_id });
        let reply = self.details.lock().unwrap().pop_front();
        resolve(reply).await
    }
}

pub fn movie(id: u64) -> MovieSummary {
    MovieSummary {
        id,
        title: format!("Filme {id}"),
        overview: String::new(),
        poster_path: None,
    }
}

pub fn page(page: u32, total_pages: u32, ids: &[u64]) -> MoviePage {
    MoviePage {
        page,
        results: ids.iter().copied().map(movie).collect(),
        total_pages,
        total_results: 0,
    }
}

pub fn details(id: u64) -> MovieDetails {
    MovieDetails {
        id,
        title: format!("Filme {id}"),
        overview: String::from("Uma sinopse."),
        poster_path: Some(String::from("/poster.jpg")),
        backdrop_path: None,
        release_date: String::from("2024-01-15"),
        vote_average: 8.567,
    }
}
