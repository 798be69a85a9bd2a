//! Reddit listing API client implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use urlencoding::encode;

use crate::config::Config;
use crate::domain::entities::{Page, PageCursor, PageRequest, Post, PostId};
use crate::domain::ports::ContentSource;
use crate::error::FetchError;

/// Listing kind of a link post
const LINK_KIND: &str = "t3";

/// Implementation of the content source over Reddit's public JSON listings
pub struct RedditClientImpl {
    http: Client,
    base_url: String,
}

impl RedditClientImpl {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    #[cfg(test)]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn page_url(&self, request: &PageRequest) -> String {
        let mut url = format!(
            "{}/r/{}/{}.json?limit={}&raw_json=1",
            self.base_url,
            request.topic.as_str(),
            request.sort,
            request.limit
        );
        if let Some(after) = &request.after {
            url.push_str("&after=");
            url.push_str(&encode(&after.0));
        }
        url
    }

    async fn handle_response(
        &self,
        request: &PageRequest,
        response: reqwest::Response,
    ) -> Result<Page, FetchError> {
        let status = response.status();
        let topic = request.topic.as_str().to_string();

        // Unknown communities are redirected to the search page
        if response.url().path().starts_with("/subreddits/search") {
            return Err(FetchError::TopicNotFound(topic));
        }

        match status {
            s if s.is_success() => {
                let body = response.text().await?;
                parse_listing(&body)
            }
            StatusCode::NOT_FOUND => Err(FetchError::TopicNotFound(topic)),
            StatusCode::FORBIDDEN => Err(FetchError::Forbidden(topic)),
            StatusCode::TOO_MANY_REQUESTS => Err(FetchError::RateLimited),
            _ => {
                let message = response.text().await.unwrap_or_default();
                Err(FetchError::Api {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}

#[async_trait]
impl ContentSource for RedditClientImpl {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page, FetchError> {
        let url = self.page_url(request);
        tracing::debug!("GET {}", url);

        let response = self.http.get(&url).send().await?;
        self.handle_response(request, response).await
    }
}

/// Response types from the listing API
#[derive(Deserialize)]
struct ListingResponse {
    data: ListingData,
}

#[derive(Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<ListingChild>,
    after: Option<String>,
}

#[derive(Deserialize)]
struct ListingChild {
    kind: String,
    data: serde_json::Value,
}

#[derive(Deserialize)]
struct PostResponse {
    id: String,
    title: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    subreddit: String,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    num_comments: u64,
    #[serde(default)]
    permalink: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    created_utc: f64,
    #[serde(default)]
    over_18: bool,
    #[serde(default)]
    is_self: bool,
}

impl From<PostResponse> for Post {
    fn from(r: PostResponse) -> Self {
        Post {
            id: PostId(r.id),
            title: r.title,
            author: r.author,
            subreddit: r.subreddit,
            score: r.score,
            num_comments: r.num_comments,
            permalink: r.permalink,
            url: r.url,
            created_utc: DateTime::<Utc>::from_timestamp(r.created_utc as i64, 0)
                .unwrap_or_default(),
            over_18: r.over_18,
            is_self: r.is_self,
        }
    }
}

/// Parse a listing body into a page, skipping children that are not posts
fn parse_listing(body: &str) -> Result<Page, FetchError> {
    let listing: ListingResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Deserialization(e.to_string()))?;

    let mut items = Vec::with_capacity(listing.data.children.len());
    for child in listing.data.children {
        if child.kind != LINK_KIND {
            continue;
        }
        let post: PostResponse = serde_json::from_value(child.data)
            .map_err(|e| FetchError::Deserialization(e.to_string()))?;
        items.push(post.into());
    }

    Ok(Page {
        items,
        after: listing
            .data
            .after
            .filter(|after| !after.is_empty())
            .map(PageCursor),
    })
}
