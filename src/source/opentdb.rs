//! Remote questions from the Open Trivia Database.

use rand::Rng;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::models::{Question, QuestionDraft, QuizSettings};

use super::SourceError;

pub const API_BASE: &str = "https://opentdb.com/api.php";
pub const API_CATEGORIES: &str = "https://opentdb.com/api_category.php";

/// A trivia category as listed by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    response_code: u8,
    #[serde(default)]
    results: Vec<ApiQuestion>,
}

#[derive(Debug, Deserialize)]
struct ApiQuestion {
    question: String,
    correct_answer: String,
    incorrect_answers: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CategoryResponse {
    #[serde(default)]
    trivia_categories: Vec<Category>,
}

#[derive(Clone)]
pub struct OpenTdbClient {
    client: Client,
    categories_url: String,
}

impl Default for OpenTdbClient {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenTdbClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            categories_url: API_CATEGORIES.to_string(),
        }
    }

    /// Fetch and normalise one quiz worth of questions from a question
    /// endpoint URL (see [`build_api_url`] and [`super::quiz_url`]).
    ///
    /// # Errors
    ///
    /// Fails on transport errors, non-success statuses, and when the API has
    /// no questions for the requested settings.
    pub async fn fetch_questions(&self, url: Url) -> Result<Vec<Question>, SourceError> {
        log::info!("fetching questions from {url}");

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(SourceError::HttpStatus(response.status()));
        }

        let body: ApiResponse = response.json().await?;
        let questions = questions_from_response(body, &mut rand::rng())?;
        log::info!("received {} questions", questions.len());
        Ok(questions)
    }

    pub async fn fetch_categories(&self) -> Result<Vec<Category>, SourceError> {
        let response = self.client.get(&self.categories_url).send().await?;
        if !response.status().is_success() {
            return Err(SourceError::HttpStatus(response.status()));
        }

        let body: CategoryResponse = response.json().await?;
        log::debug!("received {} categories", body.trivia_categories.len());
        Ok(body.trivia_categories)
    }
}

/// Question endpoint URL for `settings`; "any" filters are left out.
pub fn build_api_url(base: &str, settings: &QuizSettings) -> Result<Url, SourceError> {
    let mut url = Url::parse(base)?;
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("amount", &settings.amount.to_string());
        if !settings.category.is_empty() {
            query.append_pair("category", &settings.category);
        }
        if !settings.difficulty.as_str().is_empty() {
            query.append_pair("difficulty", settings.difficulty.as_str());
        }
        if !settings.kind.as_str().is_empty() {
            query.append_pair("type", settings.kind.as_str());
        }
    }
    Ok(url)
}

fn questions_from_response<R: Rng>(
    body: ApiResponse,
    rng: &mut R,
) -> Result<Vec<Question>, SourceError> {
    if body.response_code != 0 || body.results.is_empty() {
        return Err(SourceError::NoResults {
            code: body.response_code,
        });
    }

    body.results
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            let (options, correct_index) =
                shuffle_answers(&raw.correct_answer, &raw.incorrect_answers, &mut *rng);
            let draft = QuestionDraft::new(decode_entities(&raw.question), options, correct_index);
            Question::create(draft).map_err(|source| SourceError::InvalidQuestion {
                index: index + 1,
                source,
            })
        })
        .collect()
}

/// Decode entities, shuffle, and return the options with the 1-based index
/// of the correct one.
pub fn shuffle_answers<R: Rng>(
    correct: &str,
    incorrect: &[String],
    rng: &mut R,
) -> (Vec<String>, usize) {
    let mut tagged: Vec<(bool, String)> = incorrect
        .iter()
        .map(|answer| (false, decode_entities(answer)))
        .collect();
    tagged.push((true, decode_entities(correct)));

    shuffle(&mut tagged, rng);

    let correct_index = tagged
        .iter()
        .position(|(is_correct, _)| *is_correct)
        .map_or(tagged.len(), |i| i + 1);
    let options = tagged.into_iter().map(|(_, text)| text).collect();
    (options, correct_index)
}

/// Uniform in-place Fisher-Yates shuffle.
pub fn shuffle<T, R: Rng>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

pub fn decode_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::models::{Difficulty, QuestionType};

    fn sample_response() -> ApiResponse {
        serde_json::from_str(
            r#"{
                "response_code": 0,
                "results": [
                    {
                        "type": "multiple",
                        "difficulty": "easy",
                        "category": "Sports",
                        "question": "Which team is nicknamed &quot;the Scuderia&quot;?",
                        "correct_answer": "Ferrari",
                        "incorrect_answers": ["McLaren", "Williams", "Lotus &amp; Co"]
                    },
                    {
                        "type": "boolean",
                        "difficulty": "easy",
                        "category": "Sports",
                        "question": "Monaco is a street circuit.",
                        "correct_answer": "True",
                        "incorrect_answers": ["False"]
                    }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_url_with_all_filters() {
        let settings = QuizSettings {
            amount: 5,
            category: "21".into(),
            difficulty: Difficulty::Hard,
            kind: QuestionType::Multiple,
        };
        let url = build_api_url(API_BASE, &settings).unwrap();
        assert_eq!(
            url.as_str(),
            "https://opentdb.com/api.php?amount=5&category=21&difficulty=hard&type=multiple"
        );
    }

    #[test]
    fn test_url_skips_any_filters() {
        let url = build_api_url(API_BASE, &QuizSettings::default()).unwrap();
        assert_eq!(url.as_str(), "https://opentdb.com/api.php?amount=10");
    }

    #[test]
    fn test_normalises_response() {
        let mut rng = StdRng::seed_from_u64(7);
        let questions = questions_from_response(sample_response(), &mut rng).unwrap();

        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].text, "Which team is nicknamed \"the Scuderia\"?");
        assert_eq!(questions[0].options.len(), 4);
        assert_eq!(questions[0].correct_answer(), "Ferrari");
        assert!(questions[0].options.contains(&"Lotus & Co".to_string()));
        assert_eq!(questions[1].options.len(), 2);
        assert_eq!(questions[1].correct_answer(), "True");
    }

    #[test]
    fn test_shuffle_keeps_correct_answer_at_reported_index() {
        let incorrect = vec!["B".to_string(), "C".to_string(), "D".to_string()];
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let (options, index) = shuffle_answers("A", &incorrect, &mut rng);
            assert_eq!(options.len(), 4);
            assert_eq!(options[index - 1], "A");
        }
    }

    #[test]
    fn test_shuffle_reaches_every_position() {
        let incorrect = vec!["B".to_string(), "C".to_string(), "D".to_string()];
        let mut seen = [false; 4];
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let (_, index) = shuffle_answers("A", &incorrect, &mut rng);
            seen[index - 1] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_empty_results_fail() {
        let body: ApiResponse =
            serde_json::from_str(r#"{"response_code": 1, "results": []}"#).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let err = questions_from_response(body, &mut rng).unwrap_err();
        assert!(matches!(err, SourceError::NoResults { code: 1 }));
    }

    #[test]
    fn test_category_payload() {
        let body: CategoryResponse = serde_json::from_str(
            r#"{"trivia_categories":[{"id":9,"name":"General Knowledge"},{"id":21,"name":"Sports"}]}"#,
        )
        .unwrap();
        assert_eq!(body.trivia_categories[1].name, "Sports");
    }
}
