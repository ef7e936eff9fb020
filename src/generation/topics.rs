//! Topic catalog the generation client draws from

pub const TOPICS: &[&str] = &[
    "artificial intelligence and machine learning",
    "web development best practices",
    "cloud computing and DevOps",
    "cybersecurity trends",
    "mobile app development",
    "blockchain and cryptocurrency",
    "data science and analytics",
    "software architecture patterns",
    "frontend frameworks comparison",
    "backend technologies overview",
    "microservices architecture",
    "containerization with Docker",
    "continuous integration and deployment",
    "agile development methodologies",
    "user experience design principles",
    "database optimization techniques",
    "API design and REST principles",
    "serverless computing",
    "progressive web applications",
    "testing and quality assurance",
];

/// Pick a topic uniformly at random
pub fn random_topic() -> &'static str {
    TOPICS[fastrand::usize(..TOPICS.len())]
}
