use crate::infra::{InMemoryApplicationRepository, InMemoryNotificationPublisher};
use chowk_screening::error::AppError;
use chowk_screening::workflows::applications::{
    ApplicationAnswers, ApplicationSubmission, HeuristicEvaluator, MembershipApplicationService,
};
use clap::Args;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print the per-question sub-scores for each applicant.
    #[arg(long)]
    pub(crate) show_scores: bool,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let evaluator = Arc::new(HeuristicEvaluator::standard());
    let repository = Arc::new(InMemoryApplicationRepository::default());
    let notifier = Arc::new(InMemoryNotificationPublisher::default());
    let service = MembershipApplicationService::new(
        repository.clone(),
        notifier.clone(),
        evaluator.clone(),
    );

    println!("Membership screening demo (heuristic evaluator)");

    for submission in demo_submissions() {
        let name = submission.name.clone();
        println!("\n{name}");

        if args.show_scores {
            let scores = evaluator.question_scores(&submission.answers);
            let signals = evaluator.ai_signals(&submission.answers);
            println!(
                "  Sub-scores: motivation {} | community {} | collaboration {} | growth {} | values {}",
                scores.motivation,
                scores.community,
                scores.collaboration,
                scores.growth,
                scores.values
            );
            println!("  AI signal points: {}", signals.points);
        }

        let record = match service.apply(submission).await {
            Ok(record) => record,
            Err(err) => {
                println!("  Submission rejected: {err}");
                continue;
            }
        };

        let view = record.status_view();
        println!(
            "  {} -> {} (score {:.1}{})",
            view.application_id.0,
            view.status,
            view.score.unwrap_or_default(),
            if view.ai_detected == Some(true) {
                ", AI-generated"
            } else {
                ""
            }
        );
        println!("  Feedback: {}", view.feedback);
        if let Some(evaluation) = &record.evaluation {
            let breakdown = evaluation.result.breakdown;
            println!(
                "  Breakdown: depth {:.1} | sincerity {:.1} | creative clarity {:.1} | community mindset {:.1}",
                breakdown.depth,
                breakdown.sincerity,
                breakdown.creative_clarity,
                breakdown.community_mindset
            );
        }
    }

    let notices = notifier.notices();
    if notices.is_empty() {
        println!("\nInvitations: none dispatched");
    } else {
        println!("\nInvitations:");
        for notice in notices {
            println!(
                "  - template={} -> {} <{}>",
                notice.template, notice.application_id.0, notice.email
            );
        }
    }

    Ok(())
}

fn demo_submissions() -> Vec<ApplicationSubmission> {
    vec![
        ApplicationSubmission {
            name: "Meera Iyer".to_string(),
            email: "meera@example.com".to_string(),
            city: Some("Pune".to_string()),
            profession: Some("Filmmaker".to_string()),
            past_events: vec!["chowk-baithak-03".to_string()],
            answers: ApplicationAnswers {
                motivation: "I want to build things with people who care about craft. I have been making short films alone in Pune for three years. This community feels like the room I keep looking for.".to_string(),
                community: "A place where people share unfinished work. Nobody pretends, it stays authentic and a bit messy. We help each other when a draft falls apart.".to_string(),
                collaboration: "Last winter a few of us ran a free workshop for kids in my lane. I felt nervous but I learned that teaching made my own drawing better.".to_string(),
                growth: "I am making a picture book about my grandmother and I am excited about it. I want to improve my ink craft adn finish it this year.".to_string(),
                values: "I would like to give my time, organize monthly sketch walks and help newer members put up their first show.".to_string(),
            },
        },
        ApplicationSubmission {
            name: "Rohan Kapoor".to_string(),
            email: "rohan@example.com".to_string(),
            city: Some("Mumbai".to_string()),
            profession: Some("Founder".to_string()),
            past_events: Vec::new(),
            answers: ApplicationAnswers {
                motivation: "I am a founder and CEO growing my brand, followers, clients and revenue. Looking to scale into new markets with funding.".to_string(),
                community: "A platform for opportunity and networking with potential clients.".to_string(),
                collaboration: "I partnered with a brand to grow my audience last year.".to_string(),
                growth: "A revolutionary app that will disrupt the market.".to_string(),
                values: "I want to get exposure and benefit from access to investors.".to_string(),
            },
        },
        ApplicationSubmission {
            name: "Ananya Das".to_string(),
            email: "ananya@example.com".to_string(),
            city: None,
            profession: Some("Designer".to_string()),
            past_events: Vec::new(),
            answers: ApplicationAnswers {
                motivation: "This collective offers a holistic space to elevate creative practice and foster meaningful dialogue.".to_string(),
                community: "A creative community is an ecosystem where diverse voices cultivate shared purpose and growth.".to_string(),
                collaboration: "Collaborative initiatives amplify impact by aligning talent, vision, and execution at scale.".to_string(),
                growth: "Developing innovative solutions at the intersection of design and technology.".to_string(),
                values: "Contributing thought leadership and best practices to empower fellow creators.".to_string(),
            },
        },
    ]
}
