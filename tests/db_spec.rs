use chrono::Utc;
use speculate2::speculate;
use vibe_check::db::Database;
use vibe_check::models::*;

fn answers(pairs: &[(&str, &str)]) -> AnswerSet {
    pairs.iter().copied().collect()
}

speculate! {
    before {
        let db = Database::open_memory().expect("Failed to create in-memory database");
        db.migrate().expect("Failed to run migrations");
    }

    describe "submissions" {
        describe "insert_submission" {
            it "returns the stored record" {
                let submission = db
                    .insert_submission("fox", &answers(&[("q1", "chill"), ("q2", "nothing")]))
                    .expect("Failed to insert");

                assert_eq!(submission.identity, "fox");
                assert_eq!(submission.answers.get("q1"), Some("chill"));
                assert_eq!(submission.answers.len(), 2);
            }

            it "stamps the record with the write time" {
                let before = Utc::now();
                let submission = db
                    .insert_submission("fox", &answers(&[("q1", "chill")]))
                    .expect("Failed to insert");
                let after = Utc::now();

                assert!(submission.submitted_at >= before);
                assert!(submission.submitted_at <= after);
            }

            it "keeps duplicate submissions as separate records" {
                let payload = answers(&[("q1", "chill")]);
                let first = db.insert_submission("fox", &payload).expect("Failed to insert");
                let second = db.insert_submission("fox", &payload).expect("Failed to insert");

                assert_ne!(first.id, second.id);
                assert_eq!(db.count_submissions().expect("Count failed"), 2);
            }
        }

        describe "list_submissions" {
            it "returns empty list when nothing was submitted" {
                let submissions = db.list_submissions().expect("Query failed");
                assert!(submissions.is_empty());
            }

            it "round trips answers through JSON storage" {
                let payload = answers(&[("q2_concept", "Journey maps, \"finally\"")]);
                db.insert_submission("otter", &payload).expect("Failed to insert");

                let stored = db.list_submissions().expect("Query failed");
                assert_eq!(stored.len(), 1);
                assert_eq!(stored[0].identity, "otter");
                assert_eq!(stored[0].answers, payload);
            }

            it "returns submissions oldest first" {
                db.insert_submission("first", &answers(&[("q1", "a")])).expect("Failed to insert");
                db.insert_submission("second", &answers(&[("q1", "b")])).expect("Failed to insert");

                let stored = db.list_submissions().expect("Query failed");
                let identities: Vec<&str> = stored.iter().map(|s| s.identity.as_str()).collect();
                assert_eq!(identities, vec!["first", "second"]);
            }
        }
    }

    describe "migrate" {
        it "can run twice" {
            db.migrate().expect("Second migration run failed");
            assert_eq!(db.count_submissions().expect("Count failed"), 0);
        }
    }

    describe "open" {
        it "creates the file and its parent directory" {
            let dir = tempfile::tempdir().expect("Failed to create temp dir");
            let path = dir.path().join("nested").join("vibes.db");

            let file_db = Database::open(path.clone()).expect("Failed to open");
            file_db.migrate().expect("Failed to migrate");
            file_db.insert_submission("fox", &answers(&[("q1", "chill")])).expect("Failed to insert");

            assert!(path.exists());

            let reopened = Database::open(path).expect("Failed to reopen");
            assert_eq!(reopened.count_submissions().expect("Count failed"), 1);
        }
    }
}
