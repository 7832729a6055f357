//! Email sources for the CLI: built-in samples, files, and a terminal prompt.

use std::path::Path;
use std::sync::LazyLock;

use mail_parser::MessageParser;
use regex::Regex;
use tokio::io::{AsyncBufRead, Lines};

use crate::error::InputError;
use crate::pipeline::types::EmailInput;

/// Line that terminates the body in interactive mode.
pub const BODY_SENTINEL: &str = "END";

static HEADER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[!-9;-~]+:").expect("header line regex is valid")
});

/// Sample emails used by demo mode.
pub fn demo_emails() -> Vec<EmailInput> {
    vec![
        EmailInput::new(
            "[긴급] 선크림 SPF 테스트 결과 이상 - 출하 보류 요청",
            "안녕하세요, OO브랜드 품질관리팀 김수현입니다.

금일 입고된 선크림 LOT#2025-0892 에 대해 자체 SPF 테스트를 진행한 결과,
표기 SPF 50+ 대비 실측값이 SPF 38로 확인되었습니다.

해당 LOT 출하를 즉시 보류해 주시고, 코스맥스 측 QC 데이터 및
원인 분석 결과를 금일 중 공유 부탁드립니다.

출하 예정일이 내일(2/16)이라 매우 긴급합니다.

감사합니다.
김수현 드림",
        )
        .with_sender("soohyun.kim@oobrand.com")
        .with_date("2026-02-15"),
        EmailInput::new(
            "신규 비건 파운데이션 처방 개발 의뢰",
            "코스맥스 연구소 담당자님께,

저희 AB코스메틱에서 2026 F/W 시즌 신제품으로
비건 인증 가능한 리퀴드 파운데이션 개발을 의뢰드리고자 합니다.

주요 요구사항:
1. 비건 인증 (한국비건인증원 또는 EVE VEGAN)
2. 커버력 중~고 수준
3. 12시간 지속력
4. 색상 10호~25호 (6 shade)
5. 타겟 단가: 개당 3,500원 이내 (MOQ 10,000개 기준)

3월 초까지 초기 샘플 2-3안 검토 가능할까요?
가능한 일정과 기술 미팅 날짜를 잡아주시면 감사하겠습니다.

AB코스메틱 상품기획팀
박지연 과장 (jiyeon.park@abcosmetic.co.kr)",
        )
        .with_sender("jiyeon.park@abcosmetic.co.kr")
        .with_date("2026-02-14"),
        EmailInput::new(
            "히알루론산 원료 수급 관련 문의",
            "안녕하세요, 코스맥스 원료 담당자님.

저희가 공급 중인 저분자 히알루론산(HA-LMW-500) 원료와 관련하여,
3월분 발주량 확인 요청드립니다.

현재 글로벌 수급 상황이 다소 타이트하여
2주 전 사전 발주가 필요한 상황입니다.

참고로, 신규 원료 고분자 히알루론산(HA-HMW-2000)도 출시되었으니
스펙시트 첨부합니다. 검토 후 테스트 희망 시 샘플 발송 가능합니다.

문의사항 있으시면 연락 부탁드립니다.

(주)바이오소재
영업팀 이정호",
        )
        .with_sender("jungho.lee@biomaterials.co.kr")
        .with_date("2026-02-13"),
    ]
}

// ── File mode ───────────────────────────────────────────────────────

/// Read an email from a file. See [`parse_email_text`].
pub fn read_email_file(path: &Path) -> Result<EmailInput, InputError> {
    if !path.exists() {
        return Err(InputError::FileNotFound(path.to_path_buf()));
    }
    let text = std::fs::read_to_string(path)?;
    Ok(parse_email_text(&text))
}

/// Turn file contents into an email.
///
/// Raw RFC 5322 messages (a header block with `From:`) are decoded with
/// their subject, sender, date and plain-text body. Anything else is
/// plain text: first line is the subject (an optional `Subject:` prefix is
/// dropped), the rest is the body.
pub fn parse_email_text(text: &str) -> EmailInput {
    if looks_like_mime_message(text)
        && let Some(email) = parse_mime_message(text)
    {
        return email;
    }
    parse_plain_text(text)
}

fn parse_plain_text(text: &str) -> EmailInput {
    let text = text.trim();
    let (first, rest) = text.split_once('\n').unwrap_or((text, ""));

    let mut subject = first.trim();
    if subject
        .get(..8)
        .is_some_and(|p| p.eq_ignore_ascii_case("subject:"))
    {
        subject = subject[8..].trim();
    }

    EmailInput::new(subject, rest.trim())
}

fn looks_like_mime_message(text: &str) -> bool {
    let header_block: Vec<&str> = text
        .lines()
        .take_while(|line| !line.trim().is_empty())
        .collect();

    !header_block.is_empty()
        && header_block
            .iter()
            .all(|line| line.starts_with([' ', '\t']) || HEADER_LINE.is_match(line))
        && header_block
            .iter()
            .any(|line| line.get(..5).is_some_and(|p| p.eq_ignore_ascii_case("from:")))
}

fn parse_mime_message(text: &str) -> Option<EmailInput> {
    let parsed = MessageParser::default().parse(text.as_bytes())?;

    let subject = parsed.subject().unwrap_or_default().trim().to_string();
    let sender = parsed
        .from()
        .and_then(|addr| addr.first())
        .and_then(|a| a.address())
        .map(|s| s.to_string())
        .unwrap_or_default();
    let date = parsed.date().map(|d| d.to_rfc3339()).unwrap_or_default();
    let body = parsed
        .body_text(0)
        .map(|b| b.trim().to_string())
        .unwrap_or_default();

    Some(EmailInput::new(subject, body).with_sender(sender).with_date(date))
}

// ── Interactive mode ────────────────────────────────────────────────

/// Prompt for one email on the terminal.
///
/// Returns `Ok(None)` when the user enters an empty subject or input ends.
/// Body lines are read until a line equal to `END` (any case).
pub async fn read_interactive_email<R>(
    lines: &mut Lines<R>,
) -> Result<Option<EmailInput>, InputError>
where
    R: AsyncBufRead + Unpin,
{
    eprint!("이메일 제목: ");
    let Some(subject) = lines.next_line().await? else {
        return Ok(None);
    };
    let subject = subject.trim().to_string();
    if subject.is_empty() {
        return Ok(None);
    }

    eprint!("발신자 (선택, Enter로 건너뛰기): ");
    let sender = lines
        .next_line()
        .await?
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    eprintln!("본문 (입력 후 마지막 줄에 '{BODY_SENTINEL}' 입력):");
    let mut body_lines = Vec::new();
    while let Some(line) = lines.next_line().await? {
        if line.trim().eq_ignore_ascii_case(BODY_SENTINEL) {
            break;
        }
        body_lines.push(line);
    }
    let body = body_lines.join("\n");

    if body.trim().is_empty() {
        return Err(InputError::EmptyBody);
    }

    Ok(Some(EmailInput::new(subject, body).with_sender(sender)))
}
