use super::SeaOrmStorage;
use crate::entity::quiz_attempts::ActiveModel as AttemptActiveModel;
use crate::entity::quiz_categories::{ActiveModel, Column, Entity as QuizCategories};
use crate::entity::quiz_options::{
    ActiveModel as OptionActiveModel, Column as OptionColumn, Entity as QuizOptions,
};
use crate::entity::quiz_questions::{
    ActiveModel as QuestionActiveModel, Column as QuestionColumn, Entity as QuizQuestions,
};
use crate::errors::{KuetxError, Result};
use crate::models::quiz::{
    entities::{QuizAttempt, QuizCategory, QuizOption, QuizQuestion},
    requests::{CreateCategoryRequest, CreateQuestionRequest},
    responses::CategorySummary,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use std::collections::HashMap;

// 写入题目及其选项
async fn insert_questions<C: ConnectionTrait>(
    conn: &C,
    category_id: i64,
    questions: Vec<CreateQuestionRequest>,
) -> Result<()> {
    for question in questions {
        let saved = QuestionActiveModel {
            category_id: Set(category_id),
            text: Set(question.text),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| KuetxError::database_operation(format!("Failed to create question: {e}")))?;

        for option in question.options {
            OptionActiveModel {
                question_id: Set(saved.id),
                text: Set(option.text),
                is_correct: Set(option.is_correct),
                ..Default::default()
            }
            .insert(conn)
            .await
            .map_err(|e| KuetxError::database_operation(format!("Failed to create option: {e}")))?;
        }
    }
    Ok(())
}

impl SeaOrmStorage {
    /// 在同一事务中创建分类、题目和选项
    pub async fn create_quiz_category_impl(
        &self,
        req: CreateCategoryRequest,
    ) -> Result<QuizCategory> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| {
                KuetxError::database_operation(format!("Failed to begin transaction: {e}"))
            })?;

        let category = ActiveModel {
            name: Set(req.name),
            description: Set(req.description),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| KuetxError::database_operation(format!("Failed to create category: {e}")))?;

        insert_questions(&txn, category.id, req.questions).await?;

        txn.commit()
            .await
            .map_err(|e| {
                KuetxError::database_operation(format!("Failed to commit category: {e}"))
            })?;

        Ok(category.into_category())
    }

    /// 整体替换分类名称、描述和全部题目，分类不存在时返回 None
    pub async fn update_quiz_category_impl(
        &self,
        id: i64,
        req: CreateCategoryRequest,
    ) -> Result<Option<QuizCategory>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| {
                KuetxError::database_operation(format!("Failed to begin transaction: {e}"))
            })?;

        let Some(existing) = QuizCategories::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| KuetxError::database_operation(format!("Failed to query category: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.name = Set(req.name);
        model.description = Set(req.description);
        let category = model
            .update(&txn)
            .await
            .map_err(|e| {
                KuetxError::database_operation(format!("Failed to update category: {e}"))
            })?;

        // 选项随题目级联删除
        QuizQuestions::delete_many()
            .filter(QuestionColumn::CategoryId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| {
                KuetxError::database_operation(format!("Failed to clear questions: {e}"))
            })?;
        insert_questions(&txn, id, req.questions).await?;

        txn.commit()
            .await
            .map_err(|e| {
                KuetxError::database_operation(format!("Failed to commit category: {e}"))
            })?;

        Ok(Some(category.into_category()))
    }

    pub async fn get_quiz_category_by_id_impl(&self, id: i64) -> Result<Option<QuizCategory>> {
        let result = QuizCategories::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| KuetxError::database_operation(format!("Failed to query category: {e}")))?;

        Ok(result.map(|m| m.into_category()))
    }

    pub async fn get_quiz_category_by_name_impl(&self, name: &str) -> Result<Option<QuizCategory>> {
        let result = QuizCategories::find()
            .filter(Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(|e| KuetxError::database_operation(format!("Failed to query category: {e}")))?;

        Ok(result.map(|m| m.into_category()))
    }

    pub async fn list_quiz_categories_impl(&self) -> Result<Vec<CategorySummary>> {
        let categories = QuizCategories::find()
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| {
                KuetxError::database_operation(format!("Failed to list categories: {e}"))
            })?;

        let counts: HashMap<i64, i64> = QuizQuestions::find()
            .select_only()
            .column(QuestionColumn::CategoryId)
            .column_as(QuestionColumn::Id.count(), "question_count")
            .group_by(QuestionColumn::CategoryId)
            .into_tuple::<(i64, i64)>()
            .all(&self.db)
            .await
            .map_err(|e| KuetxError::database_operation(format!("Failed to count questions: {e}")))?
            .into_iter()
            .collect();

        Ok(categories
            .into_iter()
            .map(|m| {
                let question_count = counts.get(&m.id).copied().unwrap_or(0);
                CategorySummary {
                    category: m.into_category(),
                    question_count,
                }
            })
            .collect())
    }

    /// 题目按 ID 顺序返回，选项同样按 ID 排序
    pub async fn list_quiz_questions_impl(&self, category_id: i64) -> Result<Vec<QuizQuestion>> {
        let questions = QuizQuestions::find()
            .filter(QuestionColumn::CategoryId.eq(category_id))
            .order_by_asc(QuestionColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| KuetxError::database_operation(format!("Failed to list questions: {e}")))?;

        if questions.is_empty() {
            return Ok(Vec::new());
        }

        let question_ids: Vec<i64> = questions.iter().map(|q| q.id).collect();
        let options = QuizOptions::find()
            .filter(OptionColumn::QuestionId.is_in(question_ids))
            .order_by_asc(OptionColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| KuetxError::database_operation(format!("Failed to list options: {e}")))?;

        let mut grouped: HashMap<i64, Vec<QuizOption>> = HashMap::new();
        for option in options {
            grouped
                .entry(option.question_id)
                .or_default()
                .push(option.into_option());
        }

        Ok(questions
            .into_iter()
            .map(|q| QuizQuestion {
                options: grouped.remove(&q.id).unwrap_or_default(),
                id: q.id,
                category_id: q.category_id,
                text: q.text,
            })
            .collect())
    }

    pub async fn create_quiz_attempt_impl(
        &self,
        user_id: i64,
        category_id: i64,
        score: i32,
        total: i32,
    ) -> Result<QuizAttempt> {
        let model = AttemptActiveModel {
            user_id: Set(user_id),
            category_id: Set(category_id),
            score: Set(score),
            total: Set(total),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| KuetxError::database_operation(format!("Failed to record attempt: {e}")))?;

        Ok(result.into_attempt())
    }

    pub async fn delete_quiz_categories_impl(&self, ids: &[i64]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = QuizCategories::delete_many()
            .filter(Column::Id.is_in(ids.iter().copied()))
            .exec(&self.db)
            .await
            .map_err(|e| {
                KuetxError::database_operation(format!("Failed to delete categories: {e}"))
            })?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quiz::requests::CreateOptionRequest;

    fn question(text: &str, correct: usize) -> CreateQuestionRequest {
        CreateQuestionRequest {
            text: text.into(),
            options: (0..3)
                .map(|i| CreateOptionRequest {
                    text: format!("{text}-{i}"),
                    is_correct: i == correct,
                })
                .collect(),
        }
    }

    #[actix_web::test]
    async fn test_category_with_questions() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let category = storage
            .create_quiz_category_impl(CreateCategoryRequest {
                name: "Rust".into(),
                description: None,
                questions: vec![question("q1", 0), question("q2", 2)],
            })
            .await
            .unwrap();
        storage
            .create_quiz_category_impl(CreateCategoryRequest {
                name: "Empty".into(),
                description: Some("nothing yet".into()),
                questions: vec![],
            })
            .await
            .unwrap();

        let summaries = storage.list_quiz_categories_impl().await.unwrap();
        let counts: Vec<_> = summaries
            .iter()
            .map(|s| (s.category.name.as_str(), s.question_count))
            .collect();
        assert_eq!(counts, [("Empty", 0), ("Rust", 2)]);

        let questions = storage.list_quiz_questions_impl(category.id).await.unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].options.len(), 3);
        assert!(questions[1].options[2].is_correct);
        assert!(!questions[1].options[0].is_correct);
    }

    #[actix_web::test]
    async fn test_delete_categories_cascades() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let category = storage
            .create_quiz_category_impl(CreateCategoryRequest {
                name: "Go".into(),
                description: None,
                questions: vec![question("q1", 1)],
            })
            .await
            .unwrap();

        let deleted = storage
            .delete_quiz_categories_impl(&[category.id, category.id + 99])
            .await
            .unwrap();
        assert_eq!(deleted, 1);
        assert!(storage.list_quiz_questions_impl(category.id).await.unwrap().is_empty());
        assert_eq!(storage.delete_quiz_categories_impl(&[]).await.unwrap(), 0);
    }

    #[actix_web::test]
    async fn test_duplicate_name_rejected() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let req = || CreateCategoryRequest {
            name: "Dup".into(),
            description: None,
            questions: vec![],
        };
        storage.create_quiz_category_impl(req()).await.unwrap();
        assert!(storage.create_quiz_category_impl(req()).await.is_err());
        assert!(storage.get_quiz_category_by_name_impl("Dup").await.unwrap().is_some());
    }

    #[actix_web::test]
    async fn test_update_category_replaces_questions() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let category = storage
            .create_quiz_category_impl(CreateCategoryRequest {
                name: "SQL".into(),
                description: None,
                questions: vec![question("joins", 0), question("indexes", 1)],
            })
            .await
            .unwrap();
        let old_ids: Vec<i64> = storage
            .list_quiz_questions_impl(category.id)
            .await
            .unwrap()
            .iter()
            .map(|q| q.id)
            .collect();

        let updated = storage
            .update_quiz_category_impl(
                category.id,
                CreateCategoryRequest {
                    name: "Databases".into(),
                    description: Some("relational".into()),
                    questions: vec![question("normal forms", 2)],
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.id, category.id);
        assert_eq!(updated.name, "Databases");

        let questions = storage.list_quiz_questions_impl(category.id).await.unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].text, "normal forms");
        assert!(!old_ids.contains(&questions[0].id));
        assert!(questions[0].options[2].is_correct);

        let missing = storage
            .update_quiz_category_impl(
                category.id + 50,
                CreateCategoryRequest {
                    name: "Nope".into(),
                    description: None,
                    questions: vec![],
                },
            )
            .await
            .unwrap();
        assert!(missing.is_none());
    }
}
