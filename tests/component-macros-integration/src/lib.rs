//! 集中集成测试工程：类型描述派生宏
