//! Integration tests for the employee use cases over the in-memory store.
//!
//! Tests: Request → EmployeeService → unit of work → committed store
//!
//! Each step opens a new repository (one unit of work per request), so reads
//! only see what earlier steps committed.

#[cfg(test)]
mod tests {
    use chrono::{Months, Utc};

    use staffhub_auth::{Argon2PasswordHasher, PasswordHasher, Role};
    use staffhub_employees::{
        CreateEmployeeRequest, EmployeeRepository, EmployeeService, ErrorKind, PhoneNumberRequest,
        ResponseProjector, UpdateEmployeeRequest,
    };

    use crate::repository::{InMemoryEmployeeRepository, InMemoryEmployeeStore};

    type Service = EmployeeService<InMemoryEmployeeRepository, Argon2PasswordHasher, ResponseProjector>;

    fn service(store: &InMemoryEmployeeStore) -> Service {
        EmployeeService::new(store.repository(), Argon2PasswordHasher::new(), ResponseProjector)
    }

    fn request(doc_number: &str, email: &str) -> CreateEmployeeRequest {
        CreateEmployeeRequest {
            first_name: "John".into(),
            last_name: "Doe".into(),
            email: email.into(),
            doc_number: doc_number.into(),
            date_of_birth: Utc::now()
                .date_naive()
                .checked_sub_months(Months::new(30 * 12))
                .unwrap(),
            password: "password123".into(),
            phones: vec![PhoneNumberRequest::new("11987654321", "Mobile")],
            manager_name: None,
            role: Role::Employee,
        }
    }

    #[tokio::test]
    async fn created_employee_is_visible_to_later_requests() {
        let store = InMemoryEmployeeStore::new();
        let created = service(&store)
            .create_employee(request("12345678900", "john@test.com"), None)
            .await
            .unwrap();

        let fetched = service(&store)
            .get_employee_by_id(created.id)
            .await
            .unwrap()
            .expect("committed employee should be readable");
        assert_eq!(fetched, created);

        let stored = store
            .repository()
            .find_by_doc_number("12345678900")
            .await
            .unwrap()
            .unwrap();
        assert_ne!(stored.password_hash(), "password123");
        assert!(Argon2PasswordHasher::new().verify("password123", stored.password_hash()));
    }

    #[tokio::test]
    async fn soft_deleted_employee_keeps_its_document_number_reserved() {
        let store = InMemoryEmployeeStore::new();
        let created = service(&store)
            .create_employee(request("12345678900", "john@test.com"), None)
            .await
            .unwrap();

        service(&store).delete_employee(created.id).await.unwrap();

        assert!(service(&store).get_employee_by_id(created.id).await.unwrap().is_none());
        assert!(service(&store).get_all_employees().await.unwrap().is_empty());
        assert_eq!(store.len(), 1);

        let err = service(&store)
            .create_employee(request("12345678900", "other@test.com"), None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn update_persists_details_and_phone_replacement() {
        let store = InMemoryEmployeeStore::new();
        let created = service(&store)
            .create_employee(request("12345678900", "john@test.com"), None)
            .await
            .unwrap();

        service(&store)
            .update_employee(
                created.id,
                UpdateEmployeeRequest {
                    first_name: "Johnny".into(),
                    last_name: "Doe".into(),
                    // Keeping one's own email is not a conflict.
                    email: "john@test.com".into(),
                    date_of_birth: None,
                    phones: vec![
                        PhoneNumberRequest::new("1111", "Home"),
                        PhoneNumberRequest::new("2222", "Work"),
                    ],
                    manager_name: Some("Alice".into()),
                },
            )
            .await
            .unwrap();

        let fetched = service(&store)
            .get_employee_by_id(created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.first_name, "Johnny");
        assert_eq!(fetched.doc_number, "12345678900");
        assert_eq!(fetched.date_of_birth, created.date_of_birth);
        assert_eq!(
            fetched.phones.iter().map(|p| p.number.as_str()).collect::<Vec<_>>(),
            vec!["1111", "2222"]
        );
    }

    #[tokio::test]
    async fn get_all_lists_only_active_employees() {
        let store = InMemoryEmployeeStore::new();
        let a = service(&store)
            .create_employee(request("11111111111", "a@test.com"), None)
            .await
            .unwrap();
        service(&store)
            .create_employee(request("22222222222", "b@test.com"), None)
            .await
            .unwrap();
        service(&store).delete_employee(a.id).await.unwrap();

        let all = service(&store).get_all_employees().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].email, "b@test.com");
    }
}
