use patent_uig::applicant::{PERSONAL_NAME_MIN_CHARS, WEAK_SIGNAL_MIN_CHARS};
use patent_uig::{ApplicantClassifier, Category, RULE_TABLE_VERSION};

fn classifier() -> ApplicantClassifier {
    ApplicantClassifier::standard().expect("rule table compiles")
}

#[test]
fn representative_applicants() {
    let classifier = classifier();
    let cases = [
        ("华中科技大学", Category::University),
        ("北京航空航天大学", Category::University),
        ("浙江大学宁波理工学院", Category::University),
        ("华为技术有限公司", Category::Industry),
        ("鞍钢集团", Category::Industry),
        ("日立化成工业株式会社", Category::Industry),
        ("中国科学院化学研究所", Category::Government),
        ("北京协和医院", Category::Government),
        ("上海市环境保护局", Category::Government),
        ("国家海洋局第二海洋研究所", Category::Government),
        ("北京市第一中学", Category::Unknown),
        ("中国农业银行", Category::Unknown),
        ("中国人民武装警察部队学院研究所", Category::University),
        ("某某市公安局刑侦支队", Category::Unknown),
        ("中国红十字会总会", Category::Unknown),
        ("张三", Category::Unknown),
    ];

    for (name, expected) in cases {
        assert_eq!(classifier.classify(name), expected, "applicant {name}");
    }
}

#[test]
fn repeated_classification_is_identical() {
    let first = classifier();
    let second = classifier();
    for name in ["华中科技大学", "某某市公安局刑侦支队", "约翰史密斯先生", "中科院"] {
        assert_eq!(first.explain(name), second.explain(name));
        assert_eq!(first.explain(name), first.explain(name));
    }
    assert_eq!(first.version(), RULE_TABLE_VERSION);
}

#[test]
fn thresholds_are_ordered() {
    assert!(PERSONAL_NAME_MIN_CHARS < WEAK_SIGNAL_MIN_CHARS);
    let classifier = classifier();
    assert_eq!(
        classifier.explain("王小二").rule,
        Some("length.personal_name")
    );
    assert_eq!(classifier.explain("某某研究").rule, Some("length.weak_signal"));
}
