use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub reviewer_name: String,
    pub review_text: String,
    pub created_at: String,
    pub rating: i64,
}

impl Review {
    pub fn to_record(&self) -> ReviewRecord {
        ReviewRecord {
            name: self.reviewer_name.clone(),
            review: self.review_text.clone(),
            date: self.created_at.clone(),
            rating: self.rating,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReviewRecord {
    pub name: String,
    pub review: String,
    pub date: String,
    pub rating: i64,
}
