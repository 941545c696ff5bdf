//! Built-in FAQ corpus.
//!
//! Seeds an empty durable store and backs the read-only fixture store when
//! the database is unavailable. Order matters: it is the insertion order,
//! which decides ties during matching.

use crate::models::{Faq, FaqCategory};

struct FixtureFaq {
    id: &'static str,
    question: &'static str,
    answer: &'static str,
    category: FaqCategory,
    keywords: &'static [&'static str],
    priority: i64,
}

const FIXTURES: &[FixtureFaq] = &[
    FixtureFaq {
        id: "faq-hoc-phi",
        question: "Học phí tiếng Hàn là bao nhiêu?",
        answer: "Học phí tham khảo: Sơ cấp 1 là 2.500.000đ/khóa (3 tháng), Sơ cấp 2 là 2.800.000đ/khóa, \
                 Trung cấp là 3.200.000đ/khóa và Luyện thi TOPIK là 3.500.000đ/khóa. \
                 Đăng ký theo nhóm từ 3 người được giảm 10%.",
        category: FaqCategory::Tuition,
        keywords: &["học phí", "giá", "chi phí", "bao nhiêu tiền", "price", "tuition"],
        priority: 5,
    },
    FixtureFaq {
        id: "faq-tra-gop",
        question: "Có hỗ trợ trả góp học phí không?",
        answer: "Có. Học viên có thể chia học phí thành 2 đợt: 50% khi nhập học và 50% sau 6 tuần học.",
        category: FaqCategory::Tuition,
        keywords: &["trả góp", "chia nhỏ", "thanh toán nhiều lần", "installment"],
        priority: 4,
    },
    FixtureFaq {
        id: "faq-thanh-toan",
        question: "Có những hình thức thanh toán nào?",
        answer: "Trung tâm nhận tiền mặt tại quầy, chuyển khoản ngân hàng và thanh toán qua ví điện tử.",
        category: FaqCategory::Tuition,
        keywords: &["thanh toán", "chuyển khoản", "tiền mặt", "payment"],
        priority: 3,
    },
    FixtureFaq {
        id: "faq-hoan-tien",
        question: "Chính sách hoàn tiền như thế nào?",
        answer: "Học viên được hoàn 100% học phí nếu rút trước buổi học đầu tiên và 50% nếu rút \
                 trong 2 tuần đầu. Sau 2 tuần học phí không được hoàn lại.",
        category: FaqCategory::Policy,
        keywords: &["hoàn tiền", "hoàn học phí", "trả lại tiền", "refund"],
        priority: 4,
    },
    FixtureFaq {
        id: "faq-khoa-hoc",
        question: "Trung tâm có những khóa học tiếng Hàn nào?",
        answer: "Trung tâm mở các khóa Sơ cấp 1, Sơ cấp 2, Trung cấp, Luyện thi TOPIK và \
                 tiếng Hàn giao tiếp cho người đi làm.",
        category: FaqCategory::Course,
        keywords: &["khóa học", "chương trình", "các lớp", "course"],
        priority: 4,
    },
    FixtureFaq {
        id: "faq-thoi-luong",
        question: "Khóa học kéo dài bao lâu?",
        answer: "Mỗi khóa kéo dài khoảng 3 tháng, gồm 36 buổi học, mỗi buổi 90 phút.",
        category: FaqCategory::Course,
        keywords: &["thời gian học", "bao lâu", "mấy tháng", "duration"],
        priority: 4,
    },
    FixtureFaq {
        id: "faq-si-so",
        question: "Mỗi lớp học có bao nhiêu học viên?",
        answer: "Mỗi lớp có từ 10 đến 15 học viên để giảng viên theo sát từng bạn.",
        category: FaqCategory::Class,
        keywords: &["sĩ số", "số lượng học viên", "bao nhiêu người", "class size"],
        priority: 5,
    },
    FixtureFaq {
        id: "faq-online",
        question: "Trung tâm có lớp học online không?",
        answer: "Có. Lớp online học qua Zoom với cùng giáo trình và giảng viên như lớp tại trung tâm.",
        category: FaqCategory::Class,
        keywords: &["online", "trực tuyến", "học từ xa", "zoom"],
        priority: 4,
    },
    FixtureFaq {
        id: "faq-lich-hoc",
        question: "Lịch học các lớp như thế nào?",
        answer: "Lớp học 3 buổi mỗi tuần, có ca sáng (8h00 - 9h30), ca chiều (14h00 - 15h30) \
                 và ca tối (18h30 - 20h00).",
        category: FaqCategory::Schedule,
        keywords: &["lịch học", "thời khóa biểu", "giờ học", "ca học", "schedule"],
        priority: 4,
    },
    FixtureFaq {
        id: "faq-chung-chi",
        question: "Có chứng chỉ hoàn thành không?",
        answer: "Có. Học viên đạt bài kiểm tra cuối khóa được cấp chứng chỉ hoàn thành của trung tâm.",
        category: FaqCategory::Certificate,
        keywords: &["chứng chỉ", "bằng cấp", "giấy chứng nhận", "certificate"],
        priority: 4,
    },
    FixtureFaq {
        id: "faq-giang-vien",
        question: "Giảng viên là người Hàn Quốc hay người Việt?",
        answer: "Mỗi lớp có giảng viên Việt Nam dạy ngữ pháp và giảng viên Hàn Quốc luyện phát âm, giao tiếp.",
        category: FaqCategory::Instructor,
        keywords: &["giáo viên", "giảng viên", "thầy cô", "teacher"],
        priority: 3,
    },
    FixtureFaq {
        id: "faq-dang-ky",
        question: "Làm thế nào để đăng ký khóa học?",
        answer: "Bạn có thể đăng ký trực tiếp tại trung tâm hoặc điền form đăng ký trên website, \
                 nhân viên tư vấn sẽ liên hệ xác nhận trong 24 giờ.",
        category: FaqCategory::Enrollment,
        keywords: &["đăng ký", "ghi danh", "nhập học", "register"],
        priority: 4,
    },
    FixtureFaq {
        id: "faq-hoc-thu",
        question: "Có được học thử miễn phí không?",
        answer: "Có. Mỗi học viên mới được học thử miễn phí 1 buổi trước khi quyết định đăng ký.",
        category: FaqCategory::Enrollment,
        keywords: &["học thử", "miễn phí", "trial"],
        priority: 4,
    },
    FixtureFaq {
        id: "faq-dia-chi",
        question: "Trung tâm ở đâu?",
        answer: "Trung tâm ở số 12 đường Nguyễn Văn Linh, quận Hải Châu, Đà Nẵng.",
        category: FaqCategory::Other,
        keywords: &["địa chỉ", "ở đâu", "cơ sở", "address"],
        priority: 2,
    },
    FixtureFaq {
        id: "faq-lien-he",
        question: "Làm sao để liên hệ với trung tâm?",
        answer: "Bạn có thể gọi hotline 0236 3 888 999 hoặc gửi email tuvan@trungtam.edu.vn.",
        category: FaqCategory::Other,
        keywords: &["liên hệ", "hotline", "số điện thoại", "email"],
        priority: 2,
    },
];

/// The fixture corpus as records, in insertion order.
pub fn fixture_faqs() -> Vec<Faq> {
    FIXTURES
        .iter()
        .map(|f| Faq {
            id: f.id.to_string(),
            question: f.question.to_string(),
            answer: f.answer.to_string(),
            category: f.category,
            keywords: f.keywords.iter().map(|k| k.to_string()).collect(),
            priority: f.priority,
            is_active: true,
            view_count: 0,
            helpful_count: 0,
            created_at: 0,
            updated_at: 0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use validator::Validate;

    #[test]
    fn test_fixtures_are_valid_and_unique() {
        let faqs = fixture_faqs();
        assert!(!faqs.is_empty());
        let ids: HashSet<_> = faqs.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids.len(), faqs.len());
        for faq in &faqs {
            assert!(faq.validate().is_ok(), "invalid fixture {}", faq.id);
        }
    }
}
