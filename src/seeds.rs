//! Built-in content: topic vocabulary, quiz keyword aliases, the quiz catalog,
//! learning resources and badges. Guarantees the assistant is useful without
//! any external config.
//!
//! Declaration order matters throughout this file: the intent classifier and
//! the quiz matcher break ties by table order.

use crate::domain::{
  BadgeDefinition, Difficulty, LearningResource, Question, QuestionKind, QuizDefinition, QuizId,
  ResourceKind, SubjectFallback,
};

/// Canonical topics recognized in chat messages, in tie-break order.
pub fn topic_vocabulary() -> Vec<String> {
  [
    "python",
    "javascript",
    "web development",
    "machine learning",
    "deep learning",
    "data science",
    "ai",
    "cybersecurity",
    "soft skills",
    "communication",
    "react",
    "html",
    "css",
    "sql",
  ]
  .iter()
  .map(|s| s.to_string())
  .collect()
}

/// Quiz id -> alias keywords. Base quizzes precede their harder variants so a
/// prompt without a difficulty lands on the base quiz.
pub fn keyword_table() -> Vec<(QuizId, Vec<String>)> {
  let table: &[(&str, &[&str])] = &[
    ("webdev", &["web development", "web dev", "html", "css", "frontend", "website"]),
    ("webdevadvanced", &["advanced web", "react", "web performance", "accessibility"]),
    ("webdevexpert", &["expert web", "web architecture", "micro frontends"]),
    ("python", &["python", "python basics", "python programming"]),
    ("pythonadvanced", &["advanced python", "python decorators", "python generators"]),
    ("pythonexpert", &["expert python", "python internals", "python metaclasses"]),
    ("cybersecurity", &["cybersecurity", "cyber security", "security basics", "phishing"]),
    ("cybersecurityadvanced", &["advanced security", "penetration testing", "threat modeling"]),
    ("ai", &["artificial intelligence", "ai quiz", "ai test", "ai basics"]),
    ("aiadvanced", &["advanced ai", "advanced artificial intelligence", "ai ethics"]),
    ("machinelearning", &["machine learning", "ml quiz", "ml basics", "supervised learning"]),
    ("machinelearningadvanced", &["advanced machine learning", "advanced ml", "ensemble methods"]),
    ("deeplearning", &["deep learning", "neural network", "neural networks"]),
    ("datascience", &["data science", "data analysis", "pandas", "statistics"]),
    ("datascienceadvanced", &["advanced data science", "feature engineering", "time series"]),
    ("softskills", &["soft skills", "teamwork", "time management"]),
    ("communication", &["communication", "public speaking", "active listening"]),
  ];
  table
    .iter()
    .map(|(id, kws)| (id.to_string(), kws.iter().map(|k| k.to_string()).collect()))
    .collect()
}

/// Hand-picked subject safety net used when keyword tiers find nothing.
pub fn subject_fallbacks() -> Vec<SubjectFallback> {
  let table: &[(&[&str], &str, Option<&str>, Option<&str>)] = &[
    (&["web"], "webdev", Some("webdevadvanced"), Some("webdevexpert")),
    (&["python"], "python", Some("pythonadvanced"), Some("pythonexpert")),
    (&["security", "cyber"], "cybersecurity", Some("cybersecurityadvanced"), None),
    (&["artificial intelligence", "ai"], "ai", Some("aiadvanced"), None),
    (&["machine learning", "ml"], "machinelearning", Some("machinelearningadvanced"), None),
    (&["data science", "data analysis"], "datascience", Some("datascienceadvanced"), None),
    (&["soft skills"], "softskills", None, None),
    (&["communication"], "communication", None, None),
    (&["deep learning"], "deeplearning", None, None),
  ];
  table
    .iter()
    .map(|(subjects, base, advanced, expert)| SubjectFallback {
      subjects: subjects.iter().map(|s| s.to_string()).collect(),
      base: base.to_string(),
      advanced: advanced.map(str::to_string),
      expert: expert.map(str::to_string),
    })
    .collect()
}

fn mc(id: u32, question: &str, options: &[&str], answer: &str) -> Question {
  Question {
    id,
    question: question.into(),
    options: Some(options.iter().map(|o| o.to_string()).collect()),
    answer: answer.into(),
    kind: QuestionKind::MultipleChoice,
  }
}

fn blank(id: u32, question: &str, answer: &str) -> Question {
  Question { id, question: question.into(), options: None, answer: answer.into(), kind: QuestionKind::FillInBlank }
}

fn quiz(id: &str, topic: &str, badge_id: &str, difficulty: Difficulty, questions: Vec<Question>) -> QuizDefinition {
  QuizDefinition { id: id.into(), topic: topic.into(), badge_id: badge_id.into(), difficulty, questions }
}

/// The built-in quiz catalog, in declaration order.
pub fn seed_quizzes() -> Vec<QuizDefinition> {
  use Difficulty::*;
  vec![
    quiz("webdev", "Web Development", "web_novice", Beginner, vec![
      mc(1, "What does HTML stand for?", &["Hyper Text Markup Language", "High Tech Modern Language", "Home Tool Markup Language"], "Hyper Text Markup Language"),
      mc(2, "Which language is used to style web pages?", &["HTML", "CSS", "Python"], "CSS"),
      blank(3, "The HTML tag for the largest heading is <__>.", "h1"),
    ]),
    quiz("webdevadvanced", "Advanced Web Development", "web_builder", Advanced, vec![
      mc(1, "Which React hook manages local component state?", &["useEffect", "useState", "useMemo"], "useState"),
      mc(2, "What does CORS control?", &["Cross-origin requests", "CSS ordering", "Cookie size"], "Cross-origin requests"),
      blank(3, "The CSS layout model built around rows and columns in two dimensions is called CSS ____.", "grid"),
    ]),
    quiz("webdevexpert", "Expert Web Development", "web_architect", Expert, vec![
      mc(1, "Which HTTP header enables a Content Security Policy?", &["Content-Security-Policy", "X-Frame-Options", "Accept-Policy"], "Content-Security-Policy"),
      mc(2, "What does a service worker enable?", &["Offline caching", "Server-side rendering", "Database sharding"], "Offline caching"),
      blank(3, "Rendering pages at build time is called static site ________.", "generation"),
    ]),
    quiz("python", "Python Programming", "python_novice", Beginner, vec![
      mc(1, "Which keyword defines a function in Python?", &["func", "def", "function"], "def"),
      mc(2, "What is the output of len([1, 2, 3])?", &["2", "3", "4"], "3"),
      blank(3, "The built-in function that prints to the console is ____.", "print"),
    ]),
    quiz("pythonadvanced", "Advanced Python", "python_adept", Advanced, vec![
      mc(1, "What does the yield keyword create?", &["A generator", "A class", "A thread"], "A generator"),
      mc(2, "Which symbol applies a decorator?", &["#", "@", "$"], "@"),
      blank(3, "A with statement relies on a context ________.", "manager"),
    ]),
    quiz("pythonexpert", "Expert Python", "python_master", Expert, vec![
      mc(1, "What does the GIL limit in CPython?", &["Parallel bytecode execution", "Memory usage", "Import speed"], "Parallel bytecode execution"),
      mc(2, "Which method controls instance creation before __init__?", &["__new__", "__call__", "__enter__"], "__new__"),
      blank(3, "The class of a class is called a ____class.", "meta"),
    ]),
    quiz("cybersecurity", "Cybersecurity Fundamentals", "security_scout", Beginner, vec![
      mc(1, "What is phishing?", &["A fraudulent attempt to obtain sensitive data", "A firewall rule", "A type of encryption"], "A fraudulent attempt to obtain sensitive data"),
      mc(2, "What does 2FA stand for?", &["Two-factor authentication", "Two-file access", "Second firewall architecture"], "Two-factor authentication"),
      blank(3, "Malware that encrypts files and demands payment is called ________.", "ransomware"),
    ]),
    quiz("cybersecurityadvanced", "Advanced Cybersecurity", "security_guardian", Advanced, vec![
      mc(1, "Which attack injects malicious scripts into trusted sites?", &["XSS", "DDoS", "ARP spoofing"], "XSS"),
      mc(2, "What does the principle of least privilege limit?", &["Access rights", "Password length", "Network speed"], "Access rights"),
      blank(3, "A simulated attack used to find vulnerabilities is a penetration ____.", "test"),
    ]),
    quiz("ai", "Artificial Intelligence", "ai_explorer", Beginner, vec![
      mc(1, "Who proposed the Turing Test?", &["Alan Turing", "Ada Lovelace", "John McCarthy"], "Alan Turing"),
      mc(2, "Which of these is a branch of AI?", &["Machine learning", "Spreadsheet design", "Typography"], "Machine learning"),
      blank(3, "A program that converses with humans in natural language is a ____bot.", "chat"),
    ]),
    quiz("aiadvanced", "Advanced Artificial Intelligence", "ai_strategist", Advanced, vec![
      mc(1, "Which search algorithm uses a heuristic plus path cost?", &["A*", "Breadth-first search", "Bubble sort"], "A*"),
      mc(2, "In reinforcement learning, what does an agent maximize?", &["Cumulative reward", "Training loss", "Dataset size"], "Cumulative reward"),
      blank(3, "A model's tendency to produce systematically unfair outcomes is called ____.", "bias"),
    ]),
    quiz("machinelearning", "Machine Learning", "ml_apprentice", Beginner, vec![
      mc(1, "Learning from labeled examples is called?", &["Supervised learning", "Unsupervised learning", "Reinforcement learning"], "Supervised learning"),
      mc(2, "Which task predicts a continuous value?", &["Regression", "Classification", "Clustering"], "Regression"),
      blank(3, "A model that memorizes training data and generalizes poorly is ________.", "overfitting"),
    ]),
    quiz("machinelearningadvanced", "Advanced Machine Learning", "ml_practitioner", Advanced, vec![
      mc(1, "Random forests are an example of which technique?", &["Ensemble learning", "Dimensionality reduction", "Transfer learning"], "Ensemble learning"),
      mc(2, "What does regularization reduce?", &["Overfitting", "Dataset size", "Learning rate"], "Overfitting"),
      blank(3, "Splitting data into k folds for evaluation is called k-fold cross-__________.", "validation"),
    ]),
    quiz("deeplearning", "Deep Learning", "neural_navigator", Advanced, vec![
      mc(1, "Which layer type is common in image models?", &["Convolutional", "Recurrent", "Dropout-only"], "Convolutional"),
      mc(2, "Which algorithm computes gradients in neural networks?", &["Backpropagation", "Gradient boosting", "K-means"], "Backpropagation"),
      blank(3, "The function that adds non-linearity to a neuron is the ________ function.", "activation"),
    ]),
    quiz("datascience", "Data Science", "data_detective", Beginner, vec![
      mc(1, "Which Python library is most used for dataframes?", &["pandas", "flask", "pygame"], "pandas"),
      mc(2, "What is the middle value of a sorted dataset called?", &["Median", "Mean", "Mode"], "Median"),
      blank(3, "A chart that shows the distribution of a single variable is a __________.", "histogram"),
    ]),
    quiz("datascienceadvanced", "Advanced Data Science", "data_scientist", Advanced, vec![
      mc(1, "Which technique reduces dimensionality by finding orthogonal components?", &["PCA", "SQL joins", "One-hot encoding"], "PCA"),
      mc(2, "A p-value below the significance level suggests?", &["Rejecting the null hypothesis", "Accepting the null hypothesis", "Collecting less data"], "Rejecting the null hypothesis"),
      blank(3, "Creating new input variables from raw data is feature ___________.", "engineering"),
    ]),
    quiz("softskills", "Soft Skills", "people_person", Beginner, vec![
      mc(1, "Which habit best supports teamwork?", &["Sharing progress openly", "Working in isolation", "Avoiding feedback"], "Sharing progress openly"),
      mc(2, "What is a good first step in time management?", &["Prioritizing tasks", "Multitasking everything", "Skipping breaks"], "Prioritizing tasks"),
      blank(3, "Understanding and sharing the feelings of others is called ________.", "empathy"),
    ]),
    quiz("communication", "Communication Skills", "clear_communicator", Beginner, vec![
      mc(1, "What is active listening?", &["Fully concentrating on the speaker", "Planning your reply while they talk", "Interrupting to clarify"], "Fully concentrating on the speaker"),
      mc(2, "Which makes written messages clearer?", &["Short, specific sentences", "Lots of jargon", "Long paragraphs"], "Short, specific sentences"),
      blank(3, "Body language is a form of ___-verbal communication.", "non"),
    ]),
  ]
}

fn res(topic: &str, title: &str, url: &str, kind: ResourceKind) -> LearningResource {
  LearningResource { topic: topic.into(), title: title.into(), url: url.into(), kind }
}

/// Curated learning links, keyed by vocabulary topic.
pub fn seed_resources() -> Vec<LearningResource> {
  use ResourceKind::*;
  vec![
    res("python", "The Python Tutorial", "https://docs.python.org/3/tutorial/", Documentation),
    res("python", "Automate the Boring Stuff with Python", "https://automatetheboringstuff.com/", Course),
    res("javascript", "MDN JavaScript Guide", "https://developer.mozilla.org/en-US/docs/Web/JavaScript/Guide", Documentation),
    res("web development", "MDN Learn Web Development", "https://developer.mozilla.org/en-US/docs/Learn", Course),
    res("web development", "web.dev Learn", "https://web.dev/learn", Course),
    res("html", "MDN HTML Basics", "https://developer.mozilla.org/en-US/docs/Learn/Getting_started_with_the_web/HTML_basics", Article),
    res("css", "MDN CSS First Steps", "https://developer.mozilla.org/en-US/docs/Learn/CSS/First_steps", Article),
    res("react", "React Quick Start", "https://react.dev/learn", Documentation),
    res("machine learning", "Google Machine Learning Crash Course", "https://developers.google.com/machine-learning/crash-course", Course),
    res("deep learning", "Dive into Deep Learning", "https://d2l.ai/", Course),
    res("deep learning", "3Blue1Brown: Neural Networks", "https://www.youtube.com/playlist?list=PLZHQObOWTQDNU6R1_67000Dx_ZCJB-3pi", Video),
    res("data science", "Kaggle Learn", "https://www.kaggle.com/learn", Course),
    res("ai", "Elements of AI", "https://www.elementsofai.com/", Course),
    res("cybersecurity", "OWASP Top Ten", "https://owasp.org/www-project-top-ten/", Documentation),
    res("soft skills", "MindTools: Time Management", "https://www.mindtools.com/pages/main/newMN_HTE.htm", Article),
    res("communication", "Coursera: Improving Communication Skills", "https://www.coursera.org/learn/wharton-communication-skills", Course),
    res("sql", "SQLBolt", "https://sqlbolt.com/", Course),
  ]
}

fn badge(id: &str, name: &str, description: &str) -> BadgeDefinition {
  BadgeDefinition { id: id.into(), name: name.into(), description: description.into() }
}

/// Milestone badges plus one badge per built-in quiz.
pub fn seed_badges() -> Vec<BadgeDefinition> {
  vec![
    badge("first_steps", "First Steps", "Sent your first message"),
    badge("curious_mind", "Curious Mind", "Asked 10 questions"),
    badge("streak_3", "On a Roll", "Learned 3 days in a row"),
    badge("streak_7", "Week Warrior", "Learned 7 days in a row"),
    badge("level_5", "Rising Star", "Reached level 5"),
    badge("quiz_master", "Quiz Master", "Passed 5 quizzes"),
    badge("web_novice", "Web Novice", "Passed the Web Development quiz"),
    badge("web_builder", "Web Builder", "Passed the Advanced Web Development quiz"),
    badge("web_architect", "Web Architect", "Passed the Expert Web Development quiz"),
    badge("python_novice", "Pythonista", "Passed the Python Programming quiz"),
    badge("python_adept", "Python Adept", "Passed the Advanced Python quiz"),
    badge("python_master", "Python Master", "Passed the Expert Python quiz"),
    badge("security_scout", "Security Scout", "Passed the Cybersecurity Fundamentals quiz"),
    badge("security_guardian", "Security Guardian", "Passed the Advanced Cybersecurity quiz"),
    badge("ai_explorer", "AI Explorer", "Passed the Artificial Intelligence quiz"),
    badge("ai_strategist", "AI Strategist", "Passed the Advanced Artificial Intelligence quiz"),
    badge("ml_apprentice", "ML Apprentice", "Passed the Machine Learning quiz"),
    badge("ml_practitioner", "ML Practitioner", "Passed the Advanced Machine Learning quiz"),
    badge("neural_navigator", "Neural Navigator", "Passed the Deep Learning quiz"),
    badge("data_detective", "Data Detective", "Passed the Data Science quiz"),
    badge("data_scientist", "Data Scientist", "Passed the Advanced Data Science quiz"),
    badge("people_person", "People Person", "Passed the Soft Skills quiz"),
    badge("clear_communicator", "Clear Communicator", "Passed the Communication Skills quiz"),
  ]
}
