//! Keyword rule table for canned Aethon replies.
//!
//! Rules are checked in order against the lowercased prompt; the first rule with any
//! matching keyword wins. Matching is plain substring search, so `collaborat` also
//! catches `collaboration` and `collaborators`.

pub(crate) struct Rule {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub text: &'static str,
    pub suggestions: &'static [&'static str],
    pub actions: &'static [(&'static str, &'static str)],
}

pub(crate) const RULES: &[Rule] = &[
    Rule {
        name: "literature",
        keywords: &["literature", "review"],
        text: "I'll help you with literature analysis. Based on your research focus, here's what I found:

**Key Themes Identified:**
1. **Methodological Approaches**: Recent studies show a shift towards mixed-methods research
2. **Theoretical Frameworks**: Emerging consensus around integrated theoretical models
3. **Research Gaps**: Limited longitudinal studies in this area

**Recommended Structure:**
- Introduction to the field
- Theoretical foundations
- Methodological evolution
- Current debates and controversies
- Future research directions",
        suggestions: &[
            "Generate detailed literature review outline",
            "Identify key papers to read",
            "Create citation matrix",
            "Analyze methodology trends",
        ],
        actions: &[
            ("create_note", "Save Literature Analysis"),
            ("create_timeline", "Plan Reading Schedule"),
            ("search_papers", "Find Related Papers"),
        ],
    },
    Rule {
        name: "methodology",
        keywords: &["methodology", "method", "design"],
        text: "Based on your research question, I recommend a **mixed-methods approach**:

**Quantitative Component:**
- Survey design with validated instruments
- Sample size: 300-500 participants for statistical power
- Statistical analysis: Regression modeling, factor analysis

**Qualitative Component:**
- Semi-structured interviews (15-20 participants)
- Thematic analysis using inductive coding
- Triangulation with quantitative findings

**Ethical Considerations:**
- IRB approval required
- Informed consent protocols
- Data anonymization procedures",
        suggestions: &[
            "Create detailed methodology section",
            "Design data collection instruments",
            "Plan ethical approval process",
            "Estimate budget and resources",
        ],
        actions: &[
            ("create_project", "Create Methodology Project"),
            ("create_timeline", "Plan Research Timeline"),
            ("create_note", "Save Methodology Notes"),
        ],
    },
    Rule {
        name: "data_analysis",
        keywords: &["data", "analysis", "statistics"],
        text: "I'll help you analyze your research data. Here's my recommended approach:

**Descriptive Statistics:**
- Sample characteristics and demographics
- Central tendencies and distributions
- Missing data patterns

**Inferential Analysis:**
- Hypothesis testing using appropriate statistical tests
- Effect size calculations
- Confidence intervals

**Software Recommendations:**
- R/RStudio for advanced statistical analysis
- SPSS for standard procedures
- Python for machine learning approaches",
        suggestions: &[
            "Generate analysis plan",
            "Create data visualization",
            "Interpret statistical results",
            "Write results section",
        ],
        actions: &[
            ("create_note", "Save Analysis Plan"),
            ("upload_data", "Upload Dataset"),
            ("create_timeline", "Schedule Analysis Tasks"),
        ],
    },
    Rule {
        name: "writing",
        keywords: &["write", "paper", "publish"],
        text: "I'll guide you through the academic writing and publishing process:

**Paper Structure:**
1. **Abstract** (250 words): Concise summary of purpose, methods, findings, implications
2. **Introduction**: Problem statement, literature gap, research questions
3. **Methods**: Detailed methodology for replication
4. **Results**: Objective presentation of findings
5. **Discussion**: Interpretation, limitations, implications
6. **Conclusion**: Key contributions and future directions

**Submission Process:**
- Format according to journal guidelines
- Prepare compelling cover letter
- Suggest potential reviewers",
        suggestions: &[
            "Improve abstract clarity",
            "Strengthen introduction",
            "Enhance discussion section",
            "Format for target journal",
        ],
        actions: &[
            ("create_paper", "Start New Paper"),
            ("create_timeline", "Plan Writing Schedule"),
            ("find_journals", "Find Suitable Journals"),
        ],
    },
    Rule {
        name: "citations",
        keywords: &["citation", "reference", "bibliography"],
        text: "I'll help you manage your citations and references effectively:

**Citation Management:**
- Organize sources by theme and relevance
- Track citation relationships and networks
- Identify seminal works in your field

**Reference Formatting:**
- APA, MLA, Chicago and Harvard styles are generated for every citation
- Consistent style throughout document
- Proper in-text citation placement

**Source Evaluation:**
- Peer-reviewed journal articles prioritized
- Recent publications (last 5-10 years) emphasized
- Methodological quality assessment",
        suggestions: &[
            "Generate bibliography",
            "Check citation format",
            "Find missing references",
            "Analyze citation patterns",
        ],
        actions: &[
            ("create_citation", "Add New Citation"),
            ("export_bibliography", "Export Bibliography"),
            ("check_formatting", "Verify Citation Format"),
        ],
    },
    Rule {
        name: "planning",
        keywords: &["project", "timeline", "plan"],
        text: "I'll help you create a comprehensive research project plan:

**Phase 1: Preparation (Months 1-2)**
- Literature review completion
- Methodology finalization
- Ethics approval submission

**Phase 2: Data Collection (Months 3-5)**
- Participant recruitment
- Survey administration
- Data quality monitoring

**Phase 3: Analysis (Months 6-7)**
- Data cleaning and preparation
- Statistical analysis execution
- Results interpretation

**Phase 4: Dissemination (Months 8-10)**
- Paper writing and revision
- Conference presentation preparation
- Journal submission",
        suggestions: &[
            "Create detailed timeline",
            "Set milestone reminders",
            "Plan resource allocation",
            "Identify potential risks",
        ],
        actions: &[
            ("create_project", "Create New Project"),
            ("create_timeline", "Set Up Timeline"),
            ("invite_collaborators", "Add Team Members"),
        ],
    },
    Rule {
        name: "collaboration",
        keywords: &["collaborat", "team", "partner"],
        text: "I'll help you build effective research collaborations:

**Collaboration Framework:**
- Clear role definitions and responsibilities
- Regular communication schedule (weekly check-ins)
- Shared project management tools
- Intellectual property agreements

**Best Practices:**
- Establish communication protocols early
- Use collaborative writing platforms
- Regular progress reviews and feedback
- Conflict resolution procedures",
        suggestions: &[
            "Find potential collaborators",
            "Draft collaboration agreement",
            "Set up communication channels",
            "Plan collaboration timeline",
        ],
        actions: &[
            ("find_collaborators", "Search Researchers"),
            ("send_invitation", "Invite Collaborator"),
            ("create_team_project", "Start Team Project"),
        ],
    },
    Rule {
        name: "notes",
        keywords: &["note", "organize", "structure"],
        text: "I'll help you create an effective note-taking and organization system:

**Smart Note Structure:**
- **Main Ideas**: Key concepts and theories
- **Evidence**: Supporting data and examples
- **Connections**: Links to other research
- **Questions**: Areas for further exploration

**Organization Strategy:**
- Thematic categorization by research area
- Chronological organization for literature
- Project-based folders for active research
- Tag system for cross-referencing",
        suggestions: &[
            "Create note template",
            "Organize existing notes",
            "Set up tagging system",
            "Plan review schedule",
        ],
        actions: &[
            ("create_note", "Create Smart Note"),
            ("organize_notes", "Reorganize Notes"),
            ("create_template", "Save Note Template"),
        ],
    },
];

pub(crate) static DEFAULT_RULE: Rule = Rule {
    name: "default",
    keywords: &[],
    text: "I'm Aethon, your research assistant. I can help you with:

**Research Support:**
- Literature analysis and review
- Methodology design and planning
- Data analysis and interpretation
- Academic writing and publishing

**Project Management:**
- Timeline creation and tracking
- Collaboration coordination
- Resource planning and allocation

**Knowledge Organization:**
- Smart note-taking systems
- Citation management
- File organization and retrieval

What specific aspect of your research would you like to work on today?",
    suggestions: &[
        "Analyze my research literature",
        "Plan my research methodology",
        "Organize my research notes",
        "Help with academic writing",
        "Create project timeline",
        "Find research collaborators",
    ],
    actions: &[
        ("create_project", "Start New Research Project"),
        ("create_note", "Create Research Note"),
        ("upload_file", "Upload Research File"),
        ("create_timeline", "Plan Research Timeline"),
    ],
};

/// First rule whose keywords appear in the prompt, or the default rule.
pub(crate) fn match_rule(prompt: &str) -> &'static Rule {
    let lower = prompt.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| lower.contains(k)))
        .unwrap_or(&DEFAULT_RULE)
}
