//! Leaderboards computed from stored attempts.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use uuid::Uuid;

use crate::db::entity::score::Model as Score;

/// Better attempts sort first: more points, then faster, then earlier.
/// An attempt without a recorded time ranks behind timed ones.
pub fn compare_attempts(a: &Score, b: &Score) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| match (a.time_taken_secs, b.time_taken_secs) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.created_at.cmp(&b.created_at))
}

/// Best attempt per user on one quiz, ranked.
pub fn best_per_user(scores: Vec<Score>) -> Vec<Score> {
    let mut best: HashMap<Uuid, Score> = HashMap::new();
    for score in scores {
        match best.get(&score.user_id) {
            Some(current) if compare_attempts(current, &score) != Ordering::Greater => {}
            _ => {
                best.insert(score.user_id, score);
            }
        }
    }
    let mut ranked: Vec<Score> = best.into_values().collect();
    ranked.sort_by(compare_attempts);
    ranked
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalStanding {
    pub user_id: Uuid,
    pub total_points: i64,
    pub quizzes_played: u32,
}

/// Per user, the sum of their best points on every quiz they played.
/// Ties go to the player with more quizzes, then by user id.
pub fn global_ranking(scores: &[Score]) -> Vec<GlobalStanding> {
    let mut best: HashMap<(Uuid, Uuid), i32> = HashMap::new();
    for score in scores {
        best.entry((score.user_id, score.quiz_id))
            .and_modify(|points| *points = (*points).max(score.points))
            .or_insert(score.points);
    }

    let mut totals: BTreeMap<Uuid, GlobalStanding> = BTreeMap::new();
    for ((user_id, _), points) in best {
        let standing = totals.entry(user_id).or_insert(GlobalStanding {
            user_id,
            total_points: 0,
            quizzes_played: 0,
        });
        standing.total_points += i64::from(points);
        standing.quizzes_played += 1;
    }

    let mut ranked: Vec<GlobalStanding> = totals.into_values().collect();
    ranked.sort_by(|a, b| {
        b.total_points
            .cmp(&a.total_points)
            .then_with(|| b.quizzes_played.cmp(&a.quizzes_played))
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
    ranked
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    fn score(user_id: Uuid, quiz_id: Uuid, points: i32, time: Option<i32>, age_secs: i64) -> Score {
        Score {
            id: Uuid::new_v4(),
            quiz_id,
            user_id,
            points,
            max_points: 10,
            correct_count: 0,
            total_questions: 0,
            time_taken_secs: time,
            created_at: Utc::now() - Duration::seconds(age_secs),
        }
    }

    #[test]
    fn test_best_attempt_per_user() {
        let quiz = Uuid::new_v4();
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        let scores = vec![
            score(alice, quiz, 6, Some(30), 100),
            score(alice, quiz, 8, Some(90), 50),
            score(bob, quiz, 8, Some(40), 10),
        ];

        let ranked = best_per_user(scores);

        assert_eq!(ranked.len(), 2);
        assert_eq!((ranked[0].user_id, ranked[0].points), (bob, 8));
        assert_eq!((ranked[1].user_id, ranked[1].points), (alice, 8));
    }

    #[test]
    fn test_ties_prefer_timed_then_earliest() {
        let quiz = Uuid::new_v4();
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let ranked = best_per_user(vec![
            score(a, quiz, 5, None, 500),
            score(b, quiz, 5, Some(20), 10),
            score(c, quiz, 5, Some(20), 20),
        ]);

        let order: Vec<Uuid> = ranked.iter().map(|s| s.user_id).collect();
        assert_eq!(order, vec![c, b, a]);
    }

    #[test]
    fn test_global_ranking_sums_best_per_quiz() {
        let (q1, q2) = (Uuid::new_v4(), Uuid::new_v4());
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        let scores = vec![
            score(alice, q1, 3, None, 0),
            score(alice, q1, 7, None, 0),
            score(alice, q2, 2, None, 0),
            score(bob, q1, 9, None, 0),
        ];

        let ranked = global_ranking(&scores);

        assert_eq!(
            ranked,
            vec![
                GlobalStanding { user_id: alice, total_points: 9, quizzes_played: 2 },
                GlobalStanding { user_id: bob, total_points: 9, quizzes_played: 1 },
            ]
        );
    }
}
