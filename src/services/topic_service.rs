use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::PracticeTopic,
        dto::{
            request::{CreateTopicRequest, UpdateTopicRequest},
            response::DeleteResponse,
        },
    },
    repositories::{FolderRepository, QuestionRepository, QuizRepository, TopicRepository},
    services::quiz_service::unlink_questions,
};

pub struct TopicService {
    topics: Arc<dyn TopicRepository>,
    questions: Arc<dyn QuestionRepository>,
    quizzes: Arc<dyn QuizRepository>,
    folders: Arc<dyn FolderRepository>,
}

impl TopicService {
    pub fn new(
        topics: Arc<dyn TopicRepository>,
        questions: Arc<dyn QuestionRepository>,
        quizzes: Arc<dyn QuizRepository>,
        folders: Arc<dyn FolderRepository>,
    ) -> Self {
        Self {
            topics,
            questions,
            quizzes,
            folders,
        }
    }

    pub async fn get_topic(&self, id: &str) -> AppResult<PracticeTopic> {
        self.topics
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Topic with id '{}' not found", id)))
    }

    pub async fn list_topics(&self, subject_folder_id: &str) -> AppResult<Vec<PracticeTopic>> {
        self.topics.list_by_folder(subject_folder_id).await
    }

    /// Without an explicit `order_index` the topic goes after the existing ones.
    pub async fn create_topic(
        &self,
        subject_folder_id: &str,
        request: CreateTopicRequest,
    ) -> AppResult<PracticeTopic> {
        request.validate()?;

        if self.folders.find_by_id(subject_folder_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "Folder with id '{}' not found",
                subject_folder_id
            )));
        }

        let order_index = match request.order_index {
            Some(order) => order,
            None => self.topics.count_by_folder(subject_folder_id).await? as i32,
        };

        let topic = PracticeTopic::new(subject_folder_id, request.name.trim(), order_index);
        self.topics.create(topic).await
    }

    pub async fn update_topic(
        &self,
        id: &str,
        request: UpdateTopicRequest,
    ) -> AppResult<PracticeTopic> {
        request.validate()?;

        let mut topic = self.get_topic(id).await?;
        if let Some(name) = request.name.as_deref() {
            topic.rename(name.trim());
        }
        if let Some(order_index) = request.order_index {
            topic.order_index = order_index;
        }

        self.topics.update(topic).await
    }

    /// Removes the topic with its questions and every quiz link pointing at them.
    /// Quizzes keep their own rows; their question lists and counts shrink.
    pub async fn delete_topic(&self, id: &str) -> AppResult<DeleteResponse> {
        let topic = self.get_topic(id).await?;

        let question_ids = self.questions.ids_by_topic(&topic.id).await?;
        let links_removed = unlink_questions(self.quizzes.as_ref(), &question_ids).await?;
        let questions_removed = self.questions.delete_by_topic(&topic.id).await?;
        self.topics.delete(&topic.id).await?;

        log::info!(
            "Deleted topic {} with {} questions and {} quiz links",
            topic.id,
            questions_removed,
            links_removed
        );

        Ok(DeleteResponse {
            message: format!(
                "Topic deleted with {} question(s)",
                questions_removed
            ),
        })
    }

    /// Deletes every topic keyed by one of `folder_ids`, each with the same
    /// cascade as `delete_topic`.
    pub async fn delete_folder_topics(&self, folder_ids: &[String]) -> AppResult<usize> {
        let mut removed = 0;
        for folder_id in folder_ids {
            for topic in self.topics.list_by_folder(folder_id).await? {
                self.delete_topic(&topic.id).await?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}
